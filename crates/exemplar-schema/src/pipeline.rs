//! Per-table synthesis: one candidate example per root table.

use exemplar_core::config::SynthesisConfig;
use exemplar_core::errors::{ExemplarResult, SynthesisError};
use exemplar_core::models::{
    Example, SchemaSnapshot, SkipReason, SynthesisOutcome, SynthesisReport,
};
use exemplar_core::traits::{IDatabase, IQuestionGenerator};
use tracing::{info, warn};

use crate::describe::{assemble_prompt, describe_schema};
use crate::graph::JoinGraph;
use crate::introspect::introspect;
use crate::planner::JoinPlan;
use crate::question::generate_question;
use crate::synthesizer::synthesize_sql;
use crate::validator::{validate_sql, Validation};

/// Drives introspection, planning, synthesis, validation and question
/// generation over one database.
pub struct SchemaSynthesizer<'a> {
    db: &'a dyn IDatabase,
    generator: Option<&'a dyn IQuestionGenerator>,
    config: SynthesisConfig,
}

/// Everything derived once per run and shared by every root.
struct RunContext {
    schema: SchemaSnapshot,
    graph: JoinGraph,
    description: String,
}

impl<'a> SchemaSynthesizer<'a> {
    pub fn new(db: &'a dyn IDatabase, config: SynthesisConfig) -> Self {
        Self {
            db,
            generator: None,
            config,
        }
    }

    /// Without a generator every example gets the fallback question.
    pub fn with_generator(mut self, generator: &'a dyn IQuestionGenerator) -> Self {
        self.generator = Some(generator);
        self
    }

    fn db_id(&self) -> &str {
        self.config.db_id.as_deref().unwrap_or_else(|| self.db.db_id())
    }

    fn prepare(&self) -> ExemplarResult<RunContext> {
        let schema = introspect(self.db)?;
        let graph = JoinGraph::build(&schema);
        let description = describe_schema(&schema);
        Ok(RunContext {
            schema,
            graph,
            description,
        })
    }

    /// Synthesize one example per table, in catalog order. Skips are
    /// recorded in the report; only introspection failures abort the run.
    pub fn run(&self) -> ExemplarResult<SynthesisReport> {
        let ctx = self.prepare()?;
        let roots: Vec<String> = ctx.schema.table_names().map(str::to_string).collect();
        self.run_roots(&ctx, &roots)
    }

    /// Like [`run`](Self::run) but only for the named roots, in the given
    /// order. An unknown name is an error.
    pub fn run_tables(&self, tables: &[String]) -> ExemplarResult<SynthesisReport> {
        let ctx = self.prepare()?;
        self.run_roots(&ctx, tables)
    }

    fn run_roots(&self, ctx: &RunContext, roots: &[String]) -> ExemplarResult<SynthesisReport> {
        let mut report = SynthesisReport::default();
        for table in roots {
            let (outcome, fallback) = self.synthesize_root(ctx, table)?;
            if fallback {
                report.fallback_questions += 1;
            }
            report.record(outcome);
        }

        info!(
            db_id = self.db_id(),
            synthesized = report.examples.len(),
            skipped = report.skipped.len(),
            fallback_questions = report.fallback_questions,
            "synthesis run complete"
        );
        Ok(report)
    }

    /// Synthesize the example rooted at `table` alone.
    pub fn synthesize_table(&self, table: &str) -> ExemplarResult<SynthesisOutcome> {
        let ctx = self.prepare()?;
        Ok(self.synthesize_root(&ctx, table)?.0)
    }

    fn synthesize_root(
        &self,
        ctx: &RunContext,
        root: &str,
    ) -> Result<(SynthesisOutcome, bool), SynthesisError> {
        let root_table = ctx
            .schema
            .table(root)
            .ok_or_else(|| SynthesisError::RootNotFound {
                table: root.to_string(),
            })?;

        let skipped = |reason: SkipReason| {
            warn!(table = root, reason = %reason, "synthesis skipped");
            Ok((
                SynthesisOutcome::Skipped {
                    table: root.to_string(),
                    reason,
                },
                false,
            ))
        };

        let sample = match self.db.sample_row(root) {
            Ok(Some(row)) => row,
            Ok(None) => return skipped(SkipReason::EmptyTable),
            Err(e) => {
                return skipped(SkipReason::SampleFailed {
                    reason: e.to_string(),
                })
            }
        };

        let plan = JoinPlan::new(root, &ctx.graph);
        let sql = synthesize_sql(&plan, root_table, &sample, self.config.row_limit);

        if let Validation::Invalid { reason } = validate_sql(self.db, &sql) {
            return skipped(SkipReason::ValidationFailed { sql, reason });
        }

        let (question, fallback) =
            generate_question(self.generator, &sql, &self.config.fallback_question);
        let prompt = assemble_prompt(&ctx.description, &question, &sql);

        info!(table = root, joined = plan.table_count(), "example synthesized");
        let mut example = Example::new(question, self.db_id(), prompt);
        example.sql = Some(sql);
        Ok((SynthesisOutcome::Synthesized(example), fallback))
    }
}
