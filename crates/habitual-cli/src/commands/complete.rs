use habitual_core::{CoreError, ReportFormat};

use super::Context;
use crate::GlobalArgs;

pub fn run(globals: &GlobalArgs, id: &str) -> Result<(), CoreError> {
    let ctx = Context::new(globals)?;
    let mut snapshot = ctx.load()?;

    ctx.engine.apply_decay(&mut snapshot, ctx.now);
    let result = ctx.engine.complete_habit(&mut snapshot, id, ctx.now);

    match result {
        Ok(outcome) => {
            ctx.save(&mut snapshot)?;
            println!("{}", ctx.renderer.render_completion(&outcome)?);
            Ok(())
        }
        // Not a failure: the decay sweep is still persisted and we exit 0.
        Err(CoreError::AlreadyCompleted { id, date }) => {
            ctx.save(&mut snapshot)?;
            if ctx.renderer.format() == ReportFormat::Json {
                let value = serde_json::json!({
                    "id": id,
                    "date": date,
                    "already_completed": true,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("Habit '{id}' is already completed for {date}");
            }
            Ok(())
        }
        Err(e) => Err(e),
    }
}
