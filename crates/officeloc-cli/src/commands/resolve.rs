use crate::cli::ResolveArgs;
use crate::output::OutputWriter;
use crate::output_types::ResolveOutput;
use crate::storage::Storage;
use anyhow::Result;
use console::style;
use serde_json::Value;

pub async fn execute(args: ResolveArgs, storage: &Storage, output: &OutputWriter) -> Result<()> {
    let result = storage
        .resolver
        .resolve_value(&Value::String(args.latitude), &Value::String(args.longitude))
        .await;

    if output.is_json() {
        let outside = result.is_outside();
        return output.result(ResolveOutput { result, outside });
    }

    let location = if result.is_outside() {
        style(&result.location).yellow()
    } else {
        style(&result.location).green().bold()
    };
    output.kv("Location", location);
    output.kv("Coordinate", format!("{}, {}", result.latitude, result.longitude));
    Ok(())
}
