#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use postdesk::application::collection::PostCollectionView;
use postdesk::application::editor::{load_create_draft, load_edit_session};
use postdesk::application::error::AdminError;
use postdesk::application::submission::{Rejected, Submission};
use postdesk::domain::categories::Category;
use postdesk::domain::posts::{Post, PostDraft};
use serde::Serialize;
use tracing::warn;

use crate::args::PostsCmd;
use crate::client::{CliError, Ctx};
use crate::io::{read_opt_value, read_upload, read_value};
use crate::print::print_json;

/// Field changes requested on the command line, applied on top of a seeded draft.
#[derive(Debug, Default)]
pub struct DraftEdits {
    pub title: Option<String>,
    pub content: Option<String>,
    pub cover_image_url: Option<String>,
    pub cover_file: Option<PathBuf>,
    pub toggles: Vec<String>,
}

#[derive(Serialize)]
struct PostListing<'a> {
    category_options: &'a [Category],
    selected_category: Option<&'a str>,
    posts: Vec<&'a Post>,
}

pub async fn handle(ctx: &Ctx, cmd: PostsCmd) -> Result<(), CliError> {
    match cmd {
        PostsCmd::List { category } => list(ctx, category).await,
        PostsCmd::Get { id } => get(ctx, &id).await,
        PostsCmd::Create {
            title,
            content,
            content_file,
            cover_image_url,
            cover_file,
            categories,
        } => {
            let edits = DraftEdits {
                title: Some(title),
                content: Some(read_value(content, content_file)?),
                cover_image_url,
                cover_file,
                toggles: categories,
            };
            create(ctx, edits).await
        }
        PostsCmd::Edit {
            id,
            title,
            content,
            content_file,
            cover_image_url,
            cover_file,
            toggle_categories,
        } => {
            let edits = DraftEdits {
                title,
                content: read_opt_value(content, content_file)?,
                cover_image_url,
                cover_file,
                toggles: toggle_categories,
            };
            edit(ctx, &id, edits).await
        }
        PostsCmd::Delete { id } => delete(ctx, &id).await,
    }
}

pub async fn list(ctx: &Ctx, category: Option<String>) -> Result<(), CliError> {
    let mut view = PostCollectionView::load(ctx.api.as_ref()).await?;
    view.select_category(category);
    print_json(&PostListing {
        category_options: view.category_options(),
        selected_category: view.selected_category(),
        posts: view.visible(),
    })
}

pub async fn get(ctx: &Ctx, id: &str) -> Result<(), CliError> {
    let post = ctx
        .api
        .get_post(id)
        .await
        .map_err(|source| AdminError::fetch("post", source))?;
    print_json(&Post::from(post))
}

pub async fn create(ctx: &Ctx, edits: DraftEdits) -> Result<(), CliError> {
    let mut draft = load_create_draft(&ctx.directory()).await?;
    apply_edits(ctx, &mut draft, edits).await?;

    let outcome = ctx
        .controller()
        .submit(Submission::Create(draft), ctx.token())
        .await
        .map_err(report_rejected)?;
    print_json(&outcome)
}

pub async fn edit(ctx: &Ctx, id: &str, edits: DraftEdits) -> Result<(), CliError> {
    let mut draft = load_edit_session(&ctx.api, id)
        .await?
        .take_draft()
        .ok_or_else(|| CliError::InvalidInput(format!("post {id} has no editable draft")))?;
    apply_edits(ctx, &mut draft, edits).await?;

    let submission = Submission::Update {
        post_id: id.to_string(),
        draft,
    };
    let outcome = ctx
        .controller()
        .submit(submission, ctx.token())
        .await
        .map_err(report_rejected)?;
    print_json(&outcome)
}

pub async fn delete(ctx: &Ctx, id: &str) -> Result<(), CliError> {
    let view = ctx
        .controller()
        .delete_post(id, ctx.token(), || PostCollectionView::load(ctx.api.as_ref()))
        .await??;
    print_json(&view)
}

async fn apply_edits(ctx: &Ctx, draft: &mut PostDraft, edits: DraftEdits) -> Result<(), CliError> {
    if let Some(title) = edits.title {
        draft.title = title;
    }
    if let Some(content) = edits.content {
        draft.content = content;
    }
    if let Some(url) = edits.cover_image_url {
        draft.cover_image_url = url;
    }
    for id in &edits.toggles {
        if !draft.toggle_category(id) {
            warn!(category_id = %id, "unknown category id skipped");
        }
    }
    if let Some(path) = edits.cover_file {
        // Fail before touching storage when the submit cannot succeed.
        if ctx.token().is_none() {
            return Err(AdminError::AuthRequired.into());
        }
        let (file_name, data) = read_upload(&path)?;
        ctx.uploader()?.attach(draft, &file_name, data).await?;
    }
    Ok(())
}

/// The draft rides along with the rejection; log enough of it for a retry.
fn report_rejected(rejected: Rejected) -> CliError {
    if let Some(draft) = rejected.submission.draft() {
        warn!(
            title = %draft.title,
            categories = ?draft.categories.selected_in_order(),
            "submission rejected; draft kept"
        );
    }
    rejected.error.into()
}
