//! Function ID command - decodes a function ID and prints it as JSON

use clap::Args;

use crate::domain::FunctionId;

/// Arguments for the function-id command
#[derive(Args, Clone)]
pub struct FunctionIdArgs {
    /// Function ID string, e.g. mari://v1?g=...&b=...&rc=...&tm=...&seal=...
    pub value: String,
}

/// Run the function-id command
pub fn run(args: FunctionIdArgs) -> anyhow::Result<()> {
    let function_id = FunctionId::parse(&args.value)?;
    println!("{}", serde_json::to_string_pretty(&function_id)?);
    Ok(())
}
