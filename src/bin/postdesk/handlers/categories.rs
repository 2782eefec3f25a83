#![deny(clippy::all, clippy::pedantic)]

use crate::args::CategoriesCmd;
use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: CategoriesCmd) -> Result<(), CliError> {
    match cmd {
        CategoriesCmd::List => list(ctx).await,
        CategoriesCmd::Delete { id } => delete(ctx, &id).await,
    }
}

pub async fn list(ctx: &Ctx) -> Result<(), CliError> {
    let categories = ctx.directory().fetch_all().await?;
    print_json(&categories)
}

pub async fn delete(ctx: &Ctx, id: &str) -> Result<(), CliError> {
    let directory = ctx.directory();
    let remaining = ctx
        .controller()
        .delete_category(id, ctx.token(), || directory.fetch_all())
        .await??;
    print_json(&remaining)
}
