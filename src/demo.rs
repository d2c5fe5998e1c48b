use crate::{
    client::AvatarClient,
    error::Result,
    models::{format, gender, Artifact, AvatarResponse},
};

/// One independent call against the service.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Generate { size: u32, gender: &'static str },
    Save { size: u32, gender: &'static str, format: &'static str, filename: &'static str },
    BatchSave { amount: u32, size: u32, gender: &'static str, format: &'static str },
    FetchJson { size: u32, gender: &'static str },
    FetchSvg { size: u32, gender: &'static str },
}

impl Step {
    pub fn label(&self) -> String {
        match self {
            Step::Generate { .. } => "Generate a single avatar".to_string(),
            Step::Save { format, .. } => format!("Save {} avatar", format.to_uppercase()),
            Step::BatchSave { format, .. } => {
                format!("Batch save {} avatars", format.to_uppercase())
            }
            Step::FetchJson { .. } => "Fetch avatar JSON data".to_string(),
            Step::FetchSvg { .. } => "Fetch raw SVG avatar".to_string(),
        }
    }
}

/// The walkthrough run by the binary, in order.
pub fn default_steps() -> Vec<Step> {
    vec![
        Step::Generate { size: 300, gender: gender::MALE },
        Step::Save {
            size: 280,
            gender: gender::FEMALE,
            format: format::SVG,
            filename: "female_avatar",
        },
        Step::Save {
            size: 400,
            gender: gender::UNSET,
            format: format::PNG,
            filename: "random_avatar",
        },
        Step::BatchSave { amount: 3, size: 200, gender: gender::MALE, format: format::SVG },
        Step::BatchSave { amount: 2, size: 300, gender: gender::FEMALE, format: format::PNG },
        Step::FetchJson { size: 250, gender: gender::UNSET },
        Step::FetchSvg { size: 280, gender: gender::UNSET },
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Succeeded,
    Failed(String),
}

#[derive(Debug, Default)]
pub struct DemoReport {
    pub outcomes: Vec<(Step, StepOutcome)>,
    pub artifacts: Vec<Artifact>,
}

impl DemoReport {
    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, StepOutcome::Failed(_)))
            .count()
    }
}

pub async fn run(client: &AvatarClient) -> Result<DemoReport> {
    run_steps(client, &default_steps()).await
}

/// Runs the connectivity check, then every step in order.
///
/// A failed connectivity check aborts the run. Any other failure is logged and
/// recorded, and the remaining steps still run.
pub async fn run_steps(client: &AvatarClient, steps: &[Step]) -> Result<DemoReport> {
    log::info!("0️⃣  Testing API connectivity");
    if let Err(e) = client.test_connectivity().await {
        log::error!("API test failed: {}", e);
        return Err(e);
    }

    let mut report = DemoReport::default();
    for (index, step) in steps.iter().enumerate() {
        log::info!("{}. {}", index + 1, step.label());
        let outcome = match run_step(client, step).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("{} failed: {}", step.label(), e);
                StepOutcome::Failed(e.to_string())
            }
        };
        report.outcomes.push((step.clone(), outcome));
    }

    match client.list_artifacts().await {
        Ok(artifacts) => {
            log::info!("📋 Generated files:");
            for artifact in &artifacts {
                log::info!("  {} ({} bytes)", artifact.name, artifact.size);
            }
            report.artifacts = artifacts;
        }
        Err(e) => log::warn!("Could not list generated files: {}", e),
    }

    Ok(report)
}

/// Transport and file errors come back as `Err`; a `success: false` body is a failed outcome.
async fn run_step(client: &AvatarClient, step: &Step) -> Result<StepOutcome> {
    match *step {
        Step::Generate { size, gender } => {
            let response = client.generate_avatar(size, gender).await?;
            return Ok(avatar_outcome(&response, true));
        }
        Step::Save { size, gender, format, filename } => {
            client.save_avatar(size, gender, format, filename).await?;
        }
        Step::BatchSave { amount, size, gender, format } => {
            client.batch_save_avatars(amount, size, gender, format).await?;
        }
        Step::FetchJson { size, gender } => {
            let response = client.get_avatar_json(size, gender).await?;
            return Ok(avatar_outcome(&response, false));
        }
        Step::FetchSvg { size, gender } => {
            let svg = client.get_avatar_svg(size, gender).await?;
            log::info!("📄 SVG length: {} characters", svg.len());
        }
    }
    Ok(StepOutcome::Succeeded)
}

fn avatar_outcome(response: &AvatarResponse, show_svg_length: bool) -> StepOutcome {
    if response.success {
        log::info!("✅ Avatar received");
        log::info!("📏 Size: {}", response.data.size);
        log::info!("👤 Gender: {}", response.data.gender);
        if show_svg_length {
            log::info!("📄 SVG length: {} characters", response.data.svg.len());
        }
        StepOutcome::Succeeded
    } else {
        log::error!("Service reported failure: {}", response.error_message());
        StepOutcome::Failed(response.error_message().to_string())
    }
}
