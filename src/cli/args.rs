use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "dirprobe",
    version,
    about = "concurrent web directory discovery probe",
    long_about = "Dirprobe resolves every entry of a wordlist against a base URL and probes the results concurrently, reporting which paths respond and at what status.\n\nExamples:\n  dirprobe -u https://target.tld/ -w wordlist.txt\n  dirprobe -u https://target.tld/ -w wordlist.txt -t 50 -f\n  dirprobe -u https://target.tld/ -w wordlist.txt -d 0.5\n\nTip: Use --config to persist probe settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'u',
        long = "url",
        value_name = "URL",
        help_heading = "Input",
        help = "Base target URL the wordlist entries resolve against."
    )]
    pub url: Option<String>,

    #[arg(
        short = 'w',
        long = "wordlist",
        value_name = "FILE",
        help_heading = "Input",
        help = "Wordlist file with one path segment per line."
    )]
    pub wordlist: Option<String>,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.dirprobe/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 'f',
        long = "filter",
        help_heading = "Filters",
        help = "Suppress 403, 404 and 429 responses from the output."
    )]
    pub filter: bool,

    #[arg(
        short = 'd',
        long = "delay",
        value_name = "SECONDS",
        help_heading = "Performance",
        help = "Pause each worker for this long after every request."
    )]
    pub delay: Option<f64>,

    #[arg(
        short = 't',
        long = "threads",
        value_name = "N",
        help_heading = "Performance",
        help = "Worker pool size."
    )]
    pub threads: Option<usize>,

    #[arg(
        short = 'n',
        long = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,
}
