use std::path::PathBuf;

use anyhow::Context;
use mudcore::world_file::{self, Loaded};
use mudcore::{Outcome, Request, Session, Transcript, Tzid, World, dispatch};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{Level, info};

mod parse;

const DEMO_WORLD: &str = include_str!("../world/demo.yaml");

#[derive(Clone, Debug)]
struct Config {
    world: Option<PathBuf>,
    play_as: Option<String>,
    shout_spread: Option<u32>,
}

fn usage_and_exit() -> ! {
    eprintln!(
        "mudshard (console driver)\n\n\
USAGE:\n  mudshard [--world PATH] [--as NAME] [--shout-spread N]\n\n\
ENV:\n  MUD_WORLD         world yaml (default: built-in demo)\n  MUD_AS            player to control (default: first in the file)\n  MUD_SHOUT_SPREAD  rooms a shout carries (default: from the file, else 2)\n"
    );
    std::process::exit(2);
}

fn parse_args() -> Config {
    let mut world = std::env::var("MUD_WORLD").ok().map(PathBuf::from);
    let mut play_as = std::env::var("MUD_AS").ok().filter(|s| !s.trim().is_empty());
    let mut shout_spread = std::env::var("MUD_SHOUT_SPREAD")
        .ok()
        .and_then(|v| v.parse::<u32>().ok());

    let mut it = std::env::args().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--world" => {
                let v = it.next().unwrap_or_else(|| usage_and_exit());
                world = Some(PathBuf::from(v));
            }
            "--as" => {
                play_as = Some(it.next().unwrap_or_else(|| usage_and_exit()));
            }
            "--shout-spread" => {
                let v = it.next().unwrap_or_else(|| usage_and_exit());
                shout_spread = Some(v.parse().unwrap_or_else(|_| usage_and_exit()));
            }
            _ => usage_and_exit(),
        }
    }

    Config {
        world,
        play_as,
        shout_spread,
    }
}

fn load(cfg: &Config) -> anyhow::Result<(Loaded, Tzid)> {
    let mut loaded = match &cfg.world {
        Some(path) => world_file::load_path(path)?,
        None => world_file::load_str(DEMO_WORLD).context("load built-in demo world")?,
    };
    if let Some(n) = cfg.shout_spread {
        loaded.world.shout_spread = n;
    }

    let me = match &cfg.play_as {
        Some(name) => loaded
            .player(name)
            .with_context(|| format!("no player called {name} in {}", loaded.zone_name))?,
        None => match loaded.players.first() {
            Some((_, id)) => *id,
            None => anyhow::bail!("{} has no players", loaded.zone_name),
        },
    };
    Ok((loaded, me))
}

/// Runs one typed line for `me`. Unknown first words are retried as an
/// implied `go`, so a bare `east` walks.
fn run_line(world: &mut World, me: Tzid, line: &str, out: &mut Transcript) -> Outcome {
    let Some((verb, req)) = parse::parse_line(line) else {
        return Outcome::Done;
    };
    let mut s = Session::new(world, me, out);
    let mut outcome = dispatch(&mut s, &verb, &req);
    if outcome == Outcome::Ignored && verb != "go" {
        outcome = dispatch(&mut s, "go", &Request::object(line.trim()).implied());
    }
    if outcome == Outcome::Ignored {
        s.message("huh? (try: help)");
        outcome = Outcome::Done;
    }
    outcome
}

async fn flush(
    stdout: &mut tokio::io::Stdout,
    world: &World,
    me: Tzid,
    out: &mut Transcript,
) -> anyhow::Result<()> {
    for (to, text) in out.drain() {
        if to == me {
            stdout.write_all(text.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        } else {
            let name = world.get(to).map(|e| e.name.as_str()).unwrap_or("?");
            info!(to = %to, name, "{text}");
        }
    }
    stdout.flush().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,mudshard=info".into()),
        )
        .with_target(false)
        .with_max_level(Level::INFO)
        .init();

    let cfg = parse_args();
    let (loaded, me) = load(&cfg)?;
    let Loaded {
        mut world,
        zone_name,
        ..
    } = loaded;
    info!(zone = %zone_name, actor = %me, shout_spread = world.shout_spread, "mudshard ready");

    let mut stdout = tokio::io::stdout();
    let mut out = Transcript::new();
    run_line(&mut world, me, "look", &mut out);
    flush(&mut stdout, &world, me, &mut out).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let outcome = run_line(&mut world, me, &line, &mut out);
        flush(&mut stdout, &world, me, &mut out).await?;
        if outcome == Outcome::Quit {
            break;
        }
    }

    info!(actor = %me, "mudshard done");
    Ok(())
}
