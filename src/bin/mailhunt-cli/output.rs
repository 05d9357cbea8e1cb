use anyhow::{Context, Result, bail};

use crate::args::{Cli, Format};
use mailhunt_lib::{DomainRecord, GenerationReport, VerificationResult};

pub enum Report {
    Generation(GenerationReport),
    Verification(VerificationResult),
}

pub fn write_report(report: &Report, cli: &Cli) -> Result<()> {
    match cli.format {
        Format::Human => {
            if cli.out.is_some() {
                bail!("--out needs --format json or csv");
            }
            write_human(report);
            Ok(())
        }
        Format::Json => write_json(report, cli),
        Format::Csv => write_csv(report, cli),
    }
}

fn write_human(report: &Report) {
    match report {
        Report::Generation(report) => {
            println!("domain: {}", domain_summary(&report.domain_info));
            println!("accepted ({}):", report.valid_emails.len());
            for email in &report.valid_emails {
                println!("  [OK]    {email}");
            }
            println!("unverified ({}):", report.other_patterns.len());
            for email in &report.other_patterns {
                println!("  [?]     {email}");
            }
        }
        Report::Verification(result) => {
            println!("{}  score {}/100", result.email, result.score);
            println!(
                "  format: {}  role-based: {}",
                if result.format_valid { "ok" } else { "invalid" },
                yes_no(result.role_based)
            );
            println!("  domain: {}", domain_summary(&result.domain));
            println!(
                "  mailbox: exists={} catch-all={}",
                tri_state(result.mailbox.exists),
                tri_state(result.mailbox.catch_all)
            );
            if let Some(suggestion) = &result.suggestion {
                println!("  suggestion: {suggestion}");
            }
            for note in &result.info {
                println!("  - {note}");
            }
        }
    }
}

fn domain_summary(record: &DomainRecord) -> String {
    let mut summary = format!(
        "{} ({}; MX {}, A {}, SPF {}, DMARC {})",
        record.domain,
        if record.valid { "valid" } else { "invalid" },
        yes_no(record.has_mx),
        yes_no(record.has_a),
        yes_no(record.has_spf),
        yes_no(record.has_dmarc)
    );
    if !record.mx_hosts.is_empty() {
        summary.push_str(" via ");
        summary.push_str(&record.mx_hosts.join(", "));
    }
    summary
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn tri_state(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unknown",
    }
}

fn write_json(report: &Report, cli: &Cli) -> Result<()> {
    let s = match report {
        Report::Generation(report) => serde_json::to_string_pretty(report)?,
        Report::Verification(result) => serde_json::to_string_pretty(result)?,
    };
    if let Some(path) = &cli.out {
        write_all_atomically(path, s.as_bytes())?;
    } else {
        println!("{s}");
    }
    Ok(())
}

#[cfg(feature = "with-csv")]
fn write_csv(report: &Report, cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_csv_rows(&mut wtr, report)?;
        let data = wtr.into_inner()?;
        write_all_atomically(path, &data)?;
    } else {
        let mut wtr = csv::Writer::from_writer(std::io::stdout());
        write_csv_rows(&mut wtr, report)?;
        wtr.flush()?;
    }
    Ok(())
}

#[cfg(not(feature = "with-csv"))]
fn write_csv(_: &Report, _: &Cli) -> Result<()> {
    bail!("format=csv requires the 'with-csv' feature")
}

#[cfg(feature = "with-csv")]
fn write_csv_rows<W: std::io::Write>(wtr: &mut csv::Writer<W>, report: &Report) -> Result<()> {
    match report {
        Report::Generation(report) => {
            wtr.write_record(["email", "status", "domain", "mx"])?;
            let mx = report.domain_info.primary_mx().unwrap_or("");
            let rows = report
                .valid_emails
                .iter()
                .map(|email| (email, "accepted"))
                .chain(report.other_patterns.iter().map(|email| (email, "unverified")));
            for (email, status) in rows {
                wtr.write_record([email.as_str(), status, report.domain_info.domain.as_str(), mx])?;
            }
        }
        Report::Verification(result) => {
            wtr.write_record([
                "email",
                "format_valid",
                "role_based",
                "domain_valid",
                "has_mx",
                "has_spf",
                "has_dmarc",
                "exists",
                "catch_all",
                "score",
                "suggestion",
                "info",
            ])?;
            let score = result.score.to_string();
            let info = result.info.join("|");
            wtr.write_record([
                result.email.as_str(),
                bool_str(result.format_valid),
                bool_str(result.role_based),
                bool_str(result.domain.valid),
                bool_str(result.domain.has_mx),
                bool_str(result.domain.has_spf),
                bool_str(result.domain.has_dmarc),
                bool_opt_str(result.mailbox.exists),
                bool_opt_str(result.mailbox.catch_all),
                score.as_str(),
                result.suggestion.as_deref().unwrap_or(""),
                info.as_str(),
            ])?;
        }
    }
    Ok(())
}

#[cfg(feature = "with-csv")]
fn bool_str(flag: bool) -> &'static str {
    if flag { "true" } else { "false" }
}

#[cfg(feature = "with-csv")]
fn bool_opt_str(opt: Option<bool>) -> &'static str {
    match opt {
        Some(true) => "true",
        Some(false) => "false",
        None => "",
    }
}

/// Writes `path.tmp`, syncs it, then renames over `path`.
fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let tmp = format!("{path}.tmp");
    {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path).with_context(|| format!("rename {tmp} -> {path}"))?;
    Ok(())
}
