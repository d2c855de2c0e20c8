//! The SQL joins lesson.
//!
//! A lesson is an ordered list of steps. Each step carries a short narrative
//! and one literal SQL statement; running a step sends that statement through
//! a [`QueryRunner`] and pairs the step with its result.

mod steps;

use crate::db::QueryResult;
use crate::error::{JoinsError, Result};
use crate::query::QueryRunner;
use serde::Serialize;
use tracing::info;

/// Seed script for the bundled sample CRM store.
pub const SAMPLE_CRM_SQL: &str = include_str!("../../fixtures/crm.sql");

/// The join concept a step demonstrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum JoinTopic {
    Preview,
    InnerJoin,
    Using,
    Aliasing,
    LeftJoin,
    ForeignKey,
}

impl JoinTopic {
    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Preview => "preview",
            Self::InnerJoin => "inner join",
            Self::Using => "USING",
            Self::Aliasing => "aliasing",
            Self::LeftJoin => "left join",
            Self::ForeignKey => "primary vs. foreign keys",
        }
    }
}

/// One example in the lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonStep {
    /// Stable identifier used on the command line.
    pub id: &'static str,
    pub title: &'static str,
    pub topic: JoinTopic,
    pub narrative: &'static str,
    /// The literal statement the step runs.
    pub sql: &'static str,
}

/// A step together with the result it produced.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: LessonStep,
    pub result: QueryResult,
}

/// An ordered catalog of lesson steps.
#[derive(Debug, Clone)]
pub struct Lesson {
    steps: Vec<LessonStep>,
}

impl Lesson {
    /// The joins lesson over the sample CRM schema.
    pub fn crm() -> Self {
        Self {
            steps: steps::CRM_STEPS.to_vec(),
        }
    }

    /// Returns all steps in lesson order.
    pub fn steps(&self) -> &[LessonStep] {
        &self.steps
    }

    /// Looks up a step by id.
    pub fn find(&self, id: &str) -> Option<&LessonStep> {
        self.steps.iter().find(|step| step.id == id)
    }

    /// Resolves step ids, keeping the caller's order.
    ///
    /// An empty selection means the whole lesson.
    pub fn select<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<&LessonStep>> {
        if ids.is_empty() {
            return Ok(self.steps.iter().collect());
        }

        ids.iter()
            .map(|id| {
                let id = id.as_ref();
                self.find(id).ok_or_else(|| {
                    JoinsError::lesson(format!(
                        "Unknown lesson step '{id}'. Use --list to see available steps"
                    ))
                })
            })
            .collect()
    }
}

/// Runs one lesson step.
pub async fn run_step(runner: &QueryRunner<'_>, step: &LessonStep) -> Result<StepReport> {
    info!("Running lesson step {}", step.id);
    let result = runner.run(step.sql).await?;
    Ok(StepReport {
        step: step.clone(),
        result,
    })
}

/// Runs steps in order, stopping at the first failure.
pub async fn run_steps(runner: &QueryRunner<'_>, steps: &[&LessonStep]) -> Result<Vec<StepReport>> {
    let mut reports = Vec::with_capacity(steps.len());
    for step in steps {
        reports.push(run_step(runner, step).await?);
    }
    Ok(reports)
}
