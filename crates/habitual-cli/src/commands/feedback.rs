//! Feedback logging and the feedback report.

use clap::{ArgGroup, Args};
use habitual_core::{CoreError, FeedbackKind};

use super::Context;
use crate::GlobalArgs;

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("polarity").required(true).args(["positive", "negative"])))]
pub struct FeedbackArgs {
    /// Habit ID
    pub id: String,
    /// The habit helped
    #[arg(long)]
    pub positive: bool,
    /// The habit did not help or was missed
    #[arg(long)]
    pub negative: bool,
    /// Free-form note stored with the feedback
    #[arg(long)]
    pub note: Option<String>,
}

impl FeedbackArgs {
    fn kind(&self) -> FeedbackKind {
        if self.positive {
            FeedbackKind::Positive
        } else {
            FeedbackKind::Negative
        }
    }
}

pub fn run(globals: &GlobalArgs, args: FeedbackArgs) -> Result<(), CoreError> {
    let ctx = Context::new(globals)?;
    let mut snapshot = ctx.load()?;

    let kind = args.kind();
    let outcome = ctx
        .engine
        .log_feedback(&mut snapshot, &args.id, kind, args.note, ctx.now)?;
    ctx.save(&mut snapshot)?;

    println!("{}", ctx.renderer.render_feedback(&outcome)?);
    Ok(())
}

pub fn report(globals: &GlobalArgs) -> Result<(), CoreError> {
    let ctx = Context::new(globals)?;
    let snapshot = ctx.load()?;
    let entries = ctx.engine.feedback_report(&snapshot);
    println!("{}", ctx.renderer.render_feedback_report(&entries)?);
    Ok(())
}
