use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use geonet::cluster::ClusterMode;
use geonet::layout::{SimulationParams, Viewport};
use geonet::network::{DataDir, FilterCriteria, GeoPoint, NO_CONSTRAINT};
use geonet::view::{Outcome, ViewRequest, ViewSession, handoff, render};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory holding `<year>.json`, `locations.json` and `selections.json`.
    #[arg(long, default_value = "json")]
    data_dir: PathBuf,
    #[arg(long, default_value_t = 1842)]
    year: u32,

    #[arg(long, default_value = NO_CONSTRAINT)]
    company: String,
    #[arg(long, default_value = NO_CONSTRAINT)]
    location: String,
    #[arg(long, default_value = NO_CONSTRAINT)]
    occupation: String,
    #[arg(long, default_value = NO_CONSTRAINT)]
    nationality: String,

    #[arg(long, value_enum, default_value_t = ClusterMode::Company)]
    cluster_by: ClusterMode,

    #[arg(long, allow_negative_numbers = true)]
    cluster_strength: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    cluster_centre_inertia: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    link_distance: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    link_strength: Option<f64>,
    /// JSON file with simulation parameters; tunable flags take precedence.
    #[arg(long)]
    params: Option<PathBuf>,

    #[arg(long, default_value_t = 113.26, allow_negative_numbers = true)]
    center_lng: f64,
    #[arg(long, default_value_t = 23.13, allow_negative_numbers = true)]
    center_lat: f64,
    #[arg(long, default_value_t = 1440.0)]
    width: f64,
    #[arg(long, default_value_t = 920.0)]
    height: f64,

    /// Node id to select after the view is built.
    #[arg(long)]
    select: Option<String>,
    /// Where to write the map handoff JSON; stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Args {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::from_pairs([
            ("Company", self.company.as_str()),
            ("Location", self.location.as_str()),
            ("Occupation", self.occupation.as_str()),
            ("Nationality", self.nationality.as_str()),
        ])
    }

    fn simulation_params(&self) -> Result<SimulationParams> {
        let mut params = match &self.params {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => SimulationParams::default(),
        };

        let overrides = [
            (&mut params.cluster_strength, self.cluster_strength),
            (&mut params.cluster_centre_inertia, self.cluster_centre_inertia),
            (&mut params.link_distance, self.link_distance),
            (&mut params.link_strength, self.link_strength),
        ];
        for (field, flag) in overrides {
            if let Some(value) = flag {
                *field = value;
            }
        }

        Ok(params.validate()?)
    }

    fn request(&self) -> Result<ViewRequest> {
        Ok(ViewRequest {
            year: self.year,
            criteria: self.criteria(),
            mode: self.cluster_by,
            params: self.simulation_params()?,
            viewport: Viewport::new(
                GeoPoint::new(self.center_lng, self.center_lat),
                self.width,
                self.height,
            ),
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let request = args.request()?;
    let source = DataDir::new(&args.data_dir);

    let mut session = ViewSession::new();
    let ticket = session.begin_run();
    let outcome = session
        .complete(ticket, render(&source, &request))
        .with_context(|| format!("building the {} view", request.year))?;
    if outcome == Outcome::Superseded {
        warn!(year = request.year, "run was superseded before it finished");
    }

    if let Some(node_id) = &args.select {
        session.click_node(node_id);
        if session.selection().selected().is_none() {
            warn!(node_id = node_id.as_str(), "selected node is not in the view");
        }
    }

    let view = session.view().context("no view was published")?;
    let document = handoff(view, session.selection());
    let json = serde_json::to_string_pretty(&document).context("serialising handoff")?;

    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "handoff written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}").context("writing handoff to stdout")?;
        }
    }

    Ok(())
}
