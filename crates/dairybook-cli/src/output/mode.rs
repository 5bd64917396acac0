use crate::cli::{Commands, DemoCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    match command {
        Commands::Invoice { json, .. }
        | Commands::Outstanding { json, .. }
        | Commands::Customers { json, .. }
        | Commands::Missing { json, .. }
        | Commands::Production { json, .. }
        | Commands::Demo {
            command: DemoCommand::Invoice { json, .. },
        } => OutputMode::from_flag(*json),
    }
}
