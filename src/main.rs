mod models;
mod source;

use clap::Parser;
use clap::error::ErrorKind;

use models::Listing;
use source::{
    DEFAULT_API_URL, DEFAULT_HOURS_OLD, DEFAULT_LOCATION, JobSource, JobSpyClient, SearchError,
    SearchRequest,
};

#[derive(Parser, Debug)]
#[command(name = "jobfetch")]
#[command(about = "Fetch recent job listings and print them as a JSON array")]
struct Cli {
    /// Search term, e.g. "software engineer"
    search_term: String,

    /// Location to search around
    #[arg(default_value = DEFAULT_LOCATION)]
    location: String,

    /// Only include postings at most this many hours old
    #[arg(default_value_t = DEFAULT_HOURS_OLD)]
    hours_old: u32,

    /// Base URL of the JobSpy-compatible search service
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,
}

fn main() {
    // Argument errors go through the same JSON envelope as everything else;
    // only help and version keep clap's normal output.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => fail(err.to_string().trim_end()),
        },
    };

    let request = SearchRequest {
        search_term: cli.search_term,
        location: cli.location,
        hours_old: cli.hours_old,
        ..SearchRequest::default()
    };
    let client = JobSpyClient::new(cli.api_url);

    match run(&client, &request) {
        Ok(listings) => match serde_json::to_string(&listings) {
            Ok(json) => println!("{json}"),
            Err(err) => fail(&err.to_string()),
        },
        Err(err) => fail(&err.to_string()),
    }
}

/// One search, one pass over the rows. Either the whole listing set comes
/// back or an error does; there is no partial output.
fn run(source: &dyn JobSource, request: &SearchRequest) -> Result<Vec<Listing>, SearchError> {
    let rows = source.search(request)?;
    Ok(rows.iter().map(Listing::from_row).collect())
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

fn fail(message: &str) -> ! {
    eprintln!("{}", error_json(message));
    std::process::exit(1);
}
