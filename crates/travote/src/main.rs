//! Run one handler locally: reads an API gateway request as JSON on stdin and
//! prints the response JSON on stdout.
//!
//! ```text
//! echo '{"httpMethod":"GET","queryStringParameters":{"abbr":"SG"}}' | travote-handler places
//! ```

use std::io::{self, Read};

use anyhow::{Context, Result, bail};
use tracing::{Level, info};
use travote::{
    ApiRequest, FacebookVerifier, Travote, TravoteConfig, handle_countries, handle_places,
    handle_vote,
};

const USAGE: &str = "usage: travote-handler <places|countries|vote> < request.json";

fn main() -> Result<()> {
    travote::init_logging(Level::INFO)?;

    let handler = std::env::args().nth(1).context(USAGE)?;

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read request from stdin")?;
    let request: ApiRequest =
        serde_json::from_str(&input).context("stdin is not a valid API request")?;

    let config = TravoteConfig::from_env()?;
    let travote = Travote::new(config)?;

    let response = match handler.as_str() {
        "places" => handle_places(&travote, &request),
        "countries" => handle_countries(&travote, &request),
        "vote" => {
            let verifier = FacebookVerifier::from_env(travote.config())
                .context("Facebook app credentials are required for votes")?;
            handle_vote(&travote, &verifier, &request)
        }
        other => bail!("unknown handler {other:?}\n{USAGE}"),
    };
    info!(%handler, status = response.status_code, "Handled request");

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
