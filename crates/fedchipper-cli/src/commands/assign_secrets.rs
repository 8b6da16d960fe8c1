use std::io::Write;

use fedchipper::records::ClientData;
use serde::Serialize;

use crate::{
    input_output::{InputArgs, OutputArgs},
    logging::LogArgs,
    secret_args::SecretArgs,
};

/// One output row; a single assigned client.
#[derive(Serialize)]
struct AssignmentRow<'a> {
    client_id: &'a str,
    secret: &'a str,
    probability: f64,
}

/// Args for the assign-secrets command.
#[derive(clap::Args, Debug)]
pub struct AssignSecretsArgs {
    #[clap(flatten)]
    pub logging: LogArgs,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    secrets: SecretArgs,
}

impl AssignSecretsArgs {
    /// Run the assign-secrets command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;

        if self.secrets.secrets.is_empty() {
            return Err("at least one --secret is required".into());
        }

        let data = self.input.load_client_data()?;
        let Some(transform) = self.secrets.build_transform(data.client_ids())? else {
            return Ok(());
        };
        let assignment = transform.assignment();

        let mut writer = self.output.open_writer()?;
        for client_id in data.client_ids() {
            if let Some(a) = assignment.get(client_id) {
                let row = AssignmentRow {
                    client_id,
                    secret: &a.secret,
                    probability: a.probability,
                };
                serde_json::to_writer(&mut writer, &row)?;
                writeln!(writer)?;
            }
        }
        writer.flush()?;

        Ok(())
    }
}
