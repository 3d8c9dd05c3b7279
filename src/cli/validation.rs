use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(url) = args.url.as_deref() {
        if reqwest::Url::parse(url.trim()).is_err() {
            return Err(format!("invalid --url '{url}'"));
        }
    }
    if let Some(delay) = args.delay {
        if !delay.is_finite() || delay < 0.0 {
            return Err(format!(
                "invalid --delay '{delay}', expected a non-negative number of seconds"
            ));
        }
    }
    if let Some(threads) = args.threads {
        if threads == 0 {
            return Err("invalid --threads, expected a positive integer".to_string());
        }
    }
    Ok(())
}
