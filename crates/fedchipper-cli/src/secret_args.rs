use fedchipper::secrets::{SecretInsertingTransform, SecretSpec};

/// Parse a `"phrase=client_count:probability"` secret.
///
/// The phrase is split at the last `=`; so it may itself contain `=`.
pub fn parse_secret_spec(value: &str) -> Result<SecretSpec, String> {
    let (phrase, quota) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected \"phrase=count:probability\", got {value:?}"))?;
    let (count, probability) = quota
        .split_once(':')
        .ok_or_else(|| format!("expected \"count:probability\", got {quota:?}"))?;

    let client_count = count
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid client count {count:?}: {e}"))?;
    let probability = probability
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid probability {probability:?}: {e}"))?;

    Ok(SecretSpec::new(phrase, client_count, probability))
}

/// Secret insertion arg group.
#[derive(clap::Args, Debug)]
pub struct SecretArgs {
    /// Secret to insert, as "phrase=client_count:probability"; may be repeated.
    #[arg(long = "secret", value_parser = parse_secret_spec)]
    pub secrets: Vec<SecretSpec>,

    /// Secret assignment seed.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

impl SecretArgs {
    /// Build the secret inserting transform; `None` when no secrets are given.
    pub fn build_transform<S: AsRef<str>>(
        &self,
        client_ids: &[S],
    ) -> Result<Option<SecretInsertingTransform>, Box<dyn std::error::Error>> {
        if self.secrets.is_empty() {
            return Ok(None);
        }
        Ok(Some(SecretInsertingTransform::new(
            client_ids,
            &self.secrets,
            self.seed,
        )?))
    }
}
