#![deny(clippy::all, clippy::pedantic)]

use std::path::Path;

use crate::args::UploadsCmd;
use crate::client::{CliError, Ctx};
use crate::io::read_upload;
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: UploadsCmd) -> Result<(), CliError> {
    match cmd {
        UploadsCmd::Cover { file } => cover(ctx, &file).await,
    }
}

pub async fn cover(ctx: &Ctx, file: &Path) -> Result<(), CliError> {
    let uploader = ctx.uploader()?;
    let (file_name, data) = read_upload(file)?;
    let image = uploader.upload(&file_name, data).await?;
    print_json(&image)
}
