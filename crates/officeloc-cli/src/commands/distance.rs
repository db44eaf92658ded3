use crate::cli::DistanceArgs;
use crate::output::OutputWriter;
use crate::output_types::DistanceOutput;
use anyhow::Result;
use officeloc_geo::haversine_meters;

pub fn execute(args: DistanceArgs, output: &OutputWriter) -> Result<()> {
    let meters = haversine_meters(args.lat1, args.lon1, args.lat2, args.lon2);

    if output.is_json() {
        return output.result(DistanceOutput { meters });
    }
    output.kv("Distance", format!("{:.2} m", meters));
    Ok(())
}
