//! Office registry commands

use crate::cli::{AddOfficeArgs, OfficeArgs, OfficeCommand, RenameArgs, SetGeometryArgs};
use crate::output::OutputWriter;
use crate::output_types::{GeometryOutput, OfficeDetail, OfficeRow};
use crate::storage::Storage;
use anyhow::{bail, Result};
use officeloc_core::models::{Office, OfficeId};
use officeloc_geo::wkt::{format_polygon, EDITOR_PRECISION};
use officeloc_resolver::{GeometryOutcome, NewOffice, OfficeUpdate};

pub async fn execute(args: OfficeArgs, storage: &Storage, output: &OutputWriter) -> Result<()> {
    match args.command {
        OfficeCommand::Add(args) => add(args, storage, output).await,
        OfficeCommand::List => list(storage, output).await,
        OfficeCommand::Show(args) => show(OfficeId(args.id), storage, output).await,
        OfficeCommand::SetGeometry(args) => set_geometry(args, storage, output).await,
        OfficeCommand::Rename(args) => rename(args, storage, output).await,
        OfficeCommand::Remove(args) => remove(OfficeId(args.id), storage, output).await,
    }
}

async fn add(args: AddOfficeArgs, storage: &Storage, output: &OutputWriter) -> Result<()> {
    if args.name.trim().is_empty() {
        bail!("Office name must not be empty");
    }

    let office = storage
        .geometry
        .create_office(NewOffice { name: args.name, wkt: args.wkt.clone(), srid: args.srid })
        .await?;
    storage.save().await?;

    if output.is_json() {
        return output.result(OfficeRow::from(&office));
    }

    output.success(format!("Created office {} ({})", office.name, office.id));
    if args.wkt.is_some() && !office.has_geometry() {
        output.warning("The polygon could not be applied; the office has no geometry");
    }
    print_info(&office, output);
    Ok(())
}

async fn list(storage: &Storage, output: &OutputWriter) -> Result<()> {
    let offices = storage.geometry.list_offices().await?;
    output.table(offices.iter().map(OfficeRow::from).collect())
}

async fn show(id: OfficeId, storage: &Storage, output: &OutputWriter) -> Result<()> {
    let office = storage.geometry.get_office(id).await?;
    let wkt_wgs84 = storage
        .geometry
        .get_geometry_wgs84(id)
        .await?
        .map(|polygon| format_polygon(&polygon, EDITOR_PRECISION));

    if output.is_json() {
        return output.result(OfficeDetail {
            office: OfficeRow::from(&office),
            raw_wkt: office.raw_wkt.clone(),
            wkt_wgs84,
        });
    }

    output.section(format!("Office {}", office.id));
    output.kv("Name", &office.name);
    output.kv("SRID", office.source_srid);
    print_info(&office, output);
    if let Some(raw) = &office.raw_wkt {
        output.kv("Raw WKT", raw);
    }
    if let Some(wkt) = wkt_wgs84 {
        output.kv("WGS 84", wkt);
    }
    Ok(())
}

async fn set_geometry(args: SetGeometryArgs, storage: &Storage, output: &OutputWriter) -> Result<()> {
    let id = OfficeId(args.id);
    let srid = args.srid.unwrap_or_else(|| storage.geometry.default_srid());

    let outcome = storage.geometry.set_geometry(id, &args.wkt, srid).await?;
    storage.save().await?;

    let (label, reason) = match &outcome {
        GeometryOutcome::Applied(_) => ("applied", None),
        GeometryOutcome::Cleared => ("cleared", None),
        GeometryOutcome::Skipped { reason } => ("skipped", Some(reason.clone())),
    };

    if output.is_json() {
        return output.result(GeometryOutput { office_id: args.id, outcome: label, reason });
    }

    match outcome {
        GeometryOutcome::Applied(info) => {
            output.success(format!("Polygon applied to office {}", id));
            output.kv("Valid", info.is_valid);
            output.kv("Area (m²)", format!("{:.1}", info.area_m2));
        }
        GeometryOutcome::Cleared => output.success(format!("Polygon removed from office {}", id)),
        GeometryOutcome::Skipped { reason } => {
            output.warning(format!("Polygon not changed: {}", reason));
        }
    }
    Ok(())
}

async fn rename(args: RenameArgs, storage: &Storage, output: &OutputWriter) -> Result<()> {
    if args.name.trim().is_empty() {
        bail!("Office name must not be empty");
    }

    let update = OfficeUpdate { name: Some(args.name), ..Default::default() };
    let office = storage.geometry.update_office(OfficeId(args.id), update).await?;
    storage.save().await?;

    if output.is_json() {
        return output.result(OfficeRow::from(&office));
    }
    output.success(format!("Office {} renamed to {}", office.id, office.name));
    Ok(())
}

async fn remove(id: OfficeId, storage: &Storage, output: &OutputWriter) -> Result<()> {
    storage.geometry.delete_office(id).await?;
    storage.save().await?;

    output.success(format!("Deleted office {}", id));
    Ok(())
}

fn print_info(office: &Office, output: &OutputWriter) {
    let info = office.info;
    output.kv("Valid", info.is_valid);
    output.kv("Area (m²)", format!("{:.1}", info.area_m2));
    if office.has_geometry() {
        output.kv("Centroid", format!("{:.7}, {:.7}", info.centroid_lat, info.centroid_lon));
    }
}
