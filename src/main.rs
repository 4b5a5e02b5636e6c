use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use mongodb_index_resource::connection::MongoIndexClient;
use mongodb_index_resource::models::{DEFAULT_TIMEOUT_SECS, IndexSpec, IndexState};
use mongodb_index_resource::resource::{IndexChanges, IndexReconciler};
use mongodb_index_resource::state::ConfigManager;

const USAGE: &str = "usage: mongodb-index-resource <create|read|update|delete|import|plan> < request.json";

/// Request read from stdin; which fields are needed depends on the operation.
#[derive(Debug, Default, Deserialize)]
struct Request {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    spec: Option<IndexSpec>,
    #[serde(default)]
    state: Option<IndexState>,
}

impl Request {
    fn id(&self) -> Result<&str> {
        self.id
            .as_deref()
            .or(self.state.as_ref().map(|state| state.id.as_str()))
            .context("request needs an \"id\" or a \"state\"")
    }

    fn spec(&self) -> Result<&IndexSpec> {
        self.spec.as_ref().context("request needs a \"spec\"")
    }

    fn state(&self) -> Result<&IndexState> {
        self.state.as_ref().context("request needs a \"state\"")
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let operation = std::env::args().nth(1);
    match run(operation.as_deref()) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            let resource_err = err.downcast_ref::<mongodb_index_resource::Error>();
            // The index exists; hand its identity back so it is not orphaned
            if let Some(id) = resource_err.and_then(|err| err.created_id()) {
                println!("{}", serde_json::json!({ "id": id }));
            }
            let not_found = resource_err.is_some_and(|err| err.is_not_found());
            // Distinct code so callers can recreate instead of abort
            if not_found { ExitCode::from(2) } else { ExitCode::FAILURE }
        }
    }
}

fn run(operation: Option<&str>) -> Result<String> {
    let Some(operation) = operation else {
        bail!("{USAGE}");
    };

    let mut input = String::new();
    io::stdin().read_to_string(&mut input).context("Failed to read request from stdin")?;
    let request: Request = if input.trim().is_empty() {
        Request::default()
    } else {
        serde_json::from_str(&input).context("Failed to parse request")?
    };

    if operation == "plan" {
        let changes = IndexChanges::between(&request.state()?.spec, request.spec()?)?;
        return Ok(serde_json::to_string_pretty(&changes)?);
    }

    let config = ConfigManager::new()?.load_provider_config()?;
    let reconciler = IndexReconciler::new(MongoIndexClient::connect(&config)?);

    let state = match operation {
        "create" => reconciler.create(request.spec()?)?,
        "read" => {
            let timeout = match (&request.state, &request.spec) {
                (Some(state), _) => state.spec.timeout,
                (None, Some(spec)) => spec.timeout,
                (None, None) => DEFAULT_TIMEOUT_SECS,
            };
            reconciler.read(request.id()?, timeout)?
        }
        "update" => reconciler.update(request.state()?, request.spec()?)?,
        "import" => reconciler.import(request.id()?)?,
        "delete" => {
            reconciler.delete(request.id()?)?;
            return Ok("{}".to_string());
        }
        other => bail!("unknown operation {other:?}\n{USAGE}"),
    };

    Ok(serde_json::to_string_pretty(&state)?)
}
