//! Entry point for the vpsdash TUI. Parses args, resolves the profile and runs the App.

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use vpsdash::api::{parse_base_url, ApiClient, ClientOptions};
use vpsdash::app::App;
use vpsdash::config::{
    default_download_dir, load_profiles, save_profiles, ProfileEntry, ProfileRequest,
    ResolveProfile,
};
use vpsdash::dashboard::Dashboard;
use vpsdash::logging::{init_file_logging, LOG_ENV};

const USAGE: &str = "[--tls-ca CERT_PEM|-t CERT_PEM] [--profile NAME|-P NAME] [--save] [--dry-run] \
[--interval SECS] [--download-dir DIR] [--log FILE] [http(s)://HOST:PORT]";

#[derive(Debug, Default)]
struct ParsedArgs {
    url: Option<String>,
    tls_ca: Option<String>,
    profile: Option<String>,
    save: bool,
    dry_run: bool,
    interval_secs: Option<u64>,
    download_dir: Option<String>,
    log: Option<String>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "vpsdash".into());
    let mut parsed = ParsedArgs::default();

    while let Some(arg) = it.next() {
        // --flag=value is accepted for every flag that takes a value
        let (flag, inline) = match arg.split_once('=') {
            Some((f, v)) if f.starts_with("--") => (f.to_string(), Some(v.to_string())),
            _ => (arg.clone(), None),
        };
        let mut value = || inline.clone().or_else(|| it.next()).filter(|v| !v.is_empty());
        match flag.as_str() {
            "-h" | "--help" => return Err(format!("Usage: {prog} {USAGE}")),
            "--tls-ca" | "-t" => parsed.tls_ca = value(),
            "--profile" | "-P" => parsed.profile = value(),
            "--download-dir" => parsed.download_dir = value(),
            "--log" => parsed.log = value(),
            "--interval" => {
                let v = value().ok_or_else(|| format!("--interval needs a value. Usage: {prog} {USAGE}"))?;
                let secs = v
                    .parse::<u64>()
                    .map_err(|_| format!("--interval expects whole seconds, got '{v}'"))?;
                parsed.interval_secs = Some(secs);
            }
            "--save" => parsed.save = true,
            "--dry-run" => parsed.dry_run = true,
            _ => {
                if parsed.url.is_none() && !arg.starts_with('-') {
                    parsed.url = Some(arg);
                } else {
                    return Err(format!("Unexpected argument '{arg}'. Usage: {prog} {USAGE}"));
                }
            }
        }
    }
    Ok(parsed)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Reuse the same parsing logic for testability
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    let log_path = parsed
        .log
        .clone()
        .or_else(|| env::var(LOG_ENV).ok().filter(|v| !v.is_empty()));
    if let Some(path) = log_path {
        init_file_logging(PathBuf::from(path).as_path())?;
    }

    let profiles_file = load_profiles();
    let req = ProfileRequest {
        profile_name: parsed.profile.clone(),
        url: parsed.url.clone(),
        tls_ca: parsed.tls_ca.clone(),
    };
    let resolved = req.resolve(&profiles_file);

    // Determine final connection parameters (and maybe mutated profiles to persist)
    let mut profiles_mut = profiles_file.clone();
    let mut profile_name = parsed.profile.clone();
    let (url, tls_ca): (String, Option<String>) = match resolved {
        ResolveProfile::Direct(u, t) => {
            parse_base_url(&u).with_context(|| format!("bad API URL '{u}'"))?;
            if let Some(name) = parsed.profile.as_ref() {
                let write = match profiles_mut.profiles.get(name) {
                    // New profile: auto-save immediately
                    None => true,
                    Some(entry) if entry.url != u || entry.tls_ca != t => {
                        parsed.save
                            || prompt_yes_no(&format!("Overwrite existing profile '{name}'? [y/N]: "))
                    }
                    Some(_) => false,
                };
                if write {
                    let timings = profiles_mut.profiles.get(name).and_then(|e| e.timings);
                    profiles_mut.profiles.insert(
                        name.clone(),
                        ProfileEntry {
                            url: u.clone(),
                            tls_ca: t.clone(),
                            timings,
                        },
                    );
                    if let Err(err) = save_profiles(&profiles_mut) {
                        eprintln!("warning: could not save profile '{name}': {err}");
                    }
                }
            }
            (u, t)
        }
        ResolveProfile::Loaded(u, t) => (u, t),
        ResolveProfile::PromptSelect(names) => {
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = prompt_string("Enter number (or blank to abort): ")?;
            let picked = line
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| idx.checked_sub(1))
                .and_then(|idx| names.get(idx));
            match picked.and_then(|name| Some((name, profiles_mut.profiles.get(name)?))) {
                Some((name, entry)) => {
                    profile_name = Some(name.clone());
                    (entry.url.clone(), entry.tls_ca.clone())
                }
                None => return Ok(()),
            }
        }
        ResolveProfile::PromptCreate(name) => {
            eprintln!("Profile '{name}' does not exist yet.");
            let url = prompt_string("Enter URL (http://HOST:PORT or https://...): ")?;
            let url = url.trim().to_string();
            if url.is_empty() {
                return Ok(());
            }
            parse_base_url(&url).with_context(|| format!("bad API URL '{url}'"))?;
            let ca = prompt_string("Enter TLS CA path (or leave blank): ")?;
            let ca_opt = Some(ca.trim().to_string()).filter(|c| !c.is_empty());
            profiles_mut.profiles.insert(
                name.clone(),
                ProfileEntry {
                    url: url.clone(),
                    tls_ca: ca_opt.clone(),
                    timings: None,
                },
            );
            if let Err(err) = save_profiles(&profiles_mut) {
                eprintln!("warning: could not save profile '{name}': {err}");
            }
            (url, ca_opt)
        }
        ResolveProfile::None => {
            eprintln!("No URL provided and no profiles to select.");
            return Ok(());
        }
    };

    let mut timings = profiles_mut.timings_for(profile_name.as_deref());
    if let Some(secs) = parsed.interval_secs {
        timings.dashboard_interval_ms = secs.saturating_mul(1000);
    }
    let download_dir = parsed
        .download_dir
        .clone()
        .or_else(|| profiles_mut.download_dir.clone())
        .map(PathBuf::from)
        .unwrap_or_else(default_download_dir);

    tracing::info!(%url, ?timings, download_dir = %download_dir.display(), "starting");

    if parsed.dry_run {
        eprintln!(
            "vpsdash: {url} (refresh every {}s, downloads saved to {})",
            timings.dashboard_interval().as_secs(),
            download_dir.display()
        );
        return Ok(());
    }

    let api = ApiClient::new(
        &url,
        &ClientOptions {
            tls_ca: tls_ca.map(PathBuf::from),
            ..ClientOptions::default()
        },
    )
    .with_context(|| format!("creating API client for {url}"))?;
    let host = api.base_url().to_string();

    let mut app = App::new(Dashboard::new(timings, download_dir), host);
    app.run(api).await
}

fn prompt_yes_no(prompt: &str) -> bool {
    match prompt_string(prompt) {
        Ok(line) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn prompt_string(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        std::iter::once("vpsdash")
            .chain(v.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn flags_in_both_forms() {
        let p = parse_args(args(&[
            "-P",
            "phone",
            "--tls-ca=/tmp/ca.pem",
            "--interval",
            "10",
            "--download-dir=/tmp/dl",
            "--dry-run",
            "http://10.0.0.5:5000",
        ]))
        .unwrap();
        assert_eq!(p.profile.as_deref(), Some("phone"));
        assert_eq!(p.tls_ca.as_deref(), Some("/tmp/ca.pem"));
        assert_eq!(p.interval_secs, Some(10));
        assert_eq!(p.download_dir.as_deref(), Some("/tmp/dl"));
        assert_eq!(p.url.as_deref(), Some("http://10.0.0.5:5000"));
        assert!(p.dry_run && !p.save);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(args(&["--interval", "soon"])).is_err());
        assert!(parse_args(args(&["http://a:1", "http://b:2"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
        assert!(parse_args(args(&["--help"]))
            .unwrap_err()
            .starts_with("Usage:"));
    }
}
