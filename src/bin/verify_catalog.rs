use anyhow::{Context, Result};
use intakeflow::catalog::{load_catalog, validate_catalog};
use intakeflow::navigation::WizardPlan;
use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "intakeflow=warn".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = env::args().skip(1);
    let catalog_arg = args
        .next()
        .context("Usage: cargo run --bin verify_catalog -- <catalog.json> [job_type]")?;
    let job_filter = args.next();
    let catalog_path = PathBuf::from(catalog_arg);
    let catalog = load_catalog(&catalog_path)?;

    let job_types: BTreeSet<String> = match job_filter {
        Some(job_type) => BTreeSet::from([job_type]),
        None => catalog
            .questions
            .iter()
            .map(|question| question.job_type.clone())
            .collect(),
    };
    for job_type in &job_types {
        let plan = WizardPlan::build(&catalog, job_type);
        println!(
            "[{}] {} categories, {} questions",
            job_type,
            plan.categories().len(),
            plan.question_count()
        );
        for planned in plan.categories() {
            let mandatory = if planned.category.is_mandatory {
                " (mandatory)"
            } else {
                ""
            };
            println!(
                "  - {}{}: {:?}",
                planned.category.name, mandatory, planned.question_ids
            );
        }
    }

    let issues = validate_catalog(&catalog);
    if issues.is_empty() {
        println!(
            "Catalog {} verified: {} questions, {} categories.",
            catalog_path.display(),
            catalog.questions.len(),
            catalog.categories.len()
        );
        Ok(())
    } else {
        println!("Catalog verification failed:");
        for issue in &issues {
            println!("  - [{:?}] {}", issue.reason, issue.message);
        }
        anyhow::bail!("Catalog verification failed ({} issues)", issues.len())
    }
}
