//! eCampus Enrollment Console
//!
//! Drives the enrollment workflow from a terminal against the live backend:
//! pick each level in turn, fill bank details when the class needs them,
//! submit, then fetch the receipt.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::sync::Arc;

use ecampus_enrollment::config::ConfigManager;
use ecampus_enrollment::payment::{PaymentRedirect, RedirectMatcher};
use ecampus_enrollment::telemetry::{init_tracing, DEFAULT_FILTER};
use ecampus_enrollment::{
    BankField, EnrollmentWorkflow, HttpGateway, Resolution, SelectionLevel, SubmitOutcome,
};

const RECEIPT_FILE: &str = "enrollment_receipt.pdf";

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn is_quit(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "q" | "quit" | "exit")
}

/// Let the user pick a value for `level`. Returns `false` if they quit.
async fn choose(workflow: &EnrollmentWorkflow, level: SelectionLevel) -> Result<bool> {
    loop {
        let state = workflow.level(level).await;
        if state.options.is_empty() {
            println!("⚠️  No {} options available for the current selection.", level);
            return Ok(false);
        }

        println!("\n{}:", level);
        for (i, option) in state.options.iter().enumerate() {
            let marker = if state.value.as_deref() == Some(option.value.as_str()) { "●" } else { "○" };
            println!("  {} {:>2}. {}", marker, i + 1, option.label);
        }

        let hint = if state.is_selected() { " (enter to keep)" } else { "" };
        let input = prompt(&format!("Choose {}{}", level, hint))?;
        if is_quit(&input) {
            return Ok(false);
        }
        if input.is_empty() && state.is_selected() {
            return Ok(true);
        }

        let Some(option) = input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| state.options.get(i))
        else {
            println!("Enter a number between 1 and {}.", state.options.len());
            continue;
        };

        match workflow.select(level, &option.value).await {
            Resolution::Failed(message) => println!("❌ {}", message),
            Resolution::Loaded { level: next, count: 0 } => {
                println!("⚠️  No {} found for {}.", next, option.label);
            }
            _ => return Ok(true),
        }
    }
}

async fn fill_bank_details(workflow: &EnrollmentWorkflow) -> Result<()> {
    println!("\n🏦 This class needs bank and family details.");
    let current = workflow.bank_details().await;
    for field in BankField::ALL {
        let existing = current.get(field);
        let label = if existing.is_empty() {
            field.label().to_string()
        } else {
            format!("{} [{}]", field.label(), existing)
        };
        let input = prompt(&label)?;
        if !input.is_empty() {
            workflow.update_bank_field(field, input).await;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing(DEFAULT_FILTER)?;

    println!("\n{}", "═".repeat(60));
    println!("🎓 eCampus Enrollment v{}", env!("CARGO_PKG_VERSION"));
    println!("{}\n", "═".repeat(60));

    let config_path = std::env::var("ECAMPUS_CONFIG").unwrap_or_else(|_| "ecampus.json".to_string());
    let mut config = ConfigManager::new(&config_path).load().await?;
    config.apply_env()?;

    if config.student_id.is_empty() {
        config.student_id = prompt("Student ID")?;
    }

    let gateway = Arc::new(HttpGateway::new(&config).context("Failed to build HTTP client")?);
    let workflow = EnrollmentWorkflow::from_config(gateway, &config);

    if let Resolution::Failed(message) = workflow.mount().await.context("Failed to load merit record")? {
        println!("❌ Could not load talukas: {}", message);
        return Ok(());
    }

    for level in SelectionLevel::ALL {
        if !choose(&workflow, level).await? {
            println!("\n👋 Goodbye!\n");
            return Ok(());
        }
    }

    loop {
        if workflow.class_is_direct().await == Some(false) && !workflow.bank_details().await.is_complete() {
            fill_bank_details(&workflow).await?;
        }

        let blockers = workflow.blockers().await;
        if !blockers.is_empty() {
            println!("\n⚠️  Not ready to save:");
            for blocker in &blockers {
                println!("   • {}", blocker);
            }
            if is_quit(&prompt("Enter to retry, q to quit")?) {
                return Ok(());
            }
            continue;
        }

        println!("\n⚙️  Submitting...");
        match workflow.submit().await {
            SubmitOutcome::Submitted(_) => {
                println!("✅ Enrollment saved.");
                break;
            }
            SubmitOutcome::Failed(message) => {
                println!("❌ {}", message);
                workflow.reset_submission().await;
                if is_quit(&prompt("Enter to retry, q to quit")?) {
                    return Ok(());
                }
            }
            SubmitOutcome::Ignored | SubmitOutcome::NotReady => {}
        }
    }

    match workflow.download_receipt(RECEIPT_FILE).await {
        Ok(bytes) => println!("📄 Receipt saved to {} ({} bytes)", RECEIPT_FILE, bytes),
        Err(e) => println!("⚠️  Receipt unavailable: {}", e),
    }

    let matcher = RedirectMatcher::from_config(&config);
    loop {
        let url = prompt("Payment return URL (blank to finish)")?;
        if url.is_empty() {
            break;
        }
        match matcher.classify(&url) {
            PaymentRedirect::Success => {
                println!("✅ Fee payment confirmed.");
                break;
            }
            PaymentRedirect::Failure => println!("❌ Fee payment failed. Try again from the payment page."),
            PaymentRedirect::Pending => println!("⏳ Still on the payment gateway."),
        }
    }

    Ok(())
}
