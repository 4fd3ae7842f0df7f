//! Store initialization, status and daily summary commands.

use habitual_core::CoreError;

use super::Context;
use crate::GlobalArgs;

pub fn init(globals: &GlobalArgs) -> Result<(), CoreError> {
    let ctx = Context::new(globals)?;
    if ctx.store.init(ctx.now)? {
        println!("Initialized habit store at {}", ctx.store.path().display());
    } else {
        println!("Habit store already exists at {}", ctx.store.path().display());
    }
    Ok(())
}

pub fn run(globals: &GlobalArgs) -> Result<(), CoreError> {
    let ctx = Context::new(globals)?;
    let mut snapshot = ctx.load()?;

    ctx.engine.apply_decay(&mut snapshot, ctx.now);
    ctx.save(&mut snapshot)?;

    let view = ctx.engine.status_view(&snapshot);
    println!("{}", ctx.renderer.render_status(&view)?);
    Ok(())
}

pub fn summary(globals: &GlobalArgs) -> Result<(), CoreError> {
    let ctx = Context::new(globals)?;
    let snapshot = ctx.load()?;
    let summary = ctx.engine.summarize(&snapshot, ctx.now);
    println!("{}", ctx.renderer.render_summary(&summary)?);
    Ok(())
}
