use rotagraph_core::Universe;

use crate::error::CliError;

use super::CommandResult;

pub fn run() -> Result<CommandResult, CliError> {
    let universe = Universe::topix17()?;
    let data = serde_json::to_value(universe)?;
    Ok(CommandResult::ok(data))
}
