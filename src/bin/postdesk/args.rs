//! Command-line surface for `postdesk`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use postdesk::config::GlobalOverrides;

#[derive(Parser, Debug)]
#[command(name = "postdesk", version, about = "Headless admin client for a blog content API", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: GlobalOverrides,

    /// Path to file containing the admin token (takes precedence over env)
    #[arg(long, global = true, env = "POSTDESK_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Admin token from env (CLI value intentionally hidden to avoid shell history leaks)
    #[arg(long = "token-env", hide = true, env = "POSTDESK_TOKEN")]
    pub token_env: Option<String>,

    /// Extra configuration file layered over `config/default` and `postdesk`
    #[arg(long, global = true, env = "POSTDESK_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Category directory administration
    Categories(CategoriesArgs),
    /// Post management (list/read/create/edit/delete)
    Posts(PostsArgs),
    /// Cover image uploads
    Uploads(UploadsArgs),
}

#[derive(Parser, Debug)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub action: CategoriesCmd,
}

#[derive(Subcommand, Debug)]
pub enum CategoriesCmd {
    /// List every category
    List,
    /// Delete a category, then print the refreshed directory
    Delete { id: String },
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PostsCmd {
    /// List posts and the categories they use, optionally filtered
    List {
        /// Only show posts linked to this category id
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one post
    Get { id: String },
    /// Create a post
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, required_unless_present = "content_file", conflicts_with = "content_file")]
        content: Option<String>,
        #[arg(long, value_name = "PATH")]
        content_file: Option<PathBuf>,
        #[arg(long = "cover-image-url", value_name = "URL")]
        cover_image_url: Option<String>,
        /// Upload this file and use it as the cover image
        #[arg(long, value_name = "PATH")]
        cover_file: Option<PathBuf>,
        /// Category id to select (repeatable)
        #[arg(long = "category", value_name = "ID")]
        categories: Vec<String>,
    },
    /// Edit a post; unspecified fields keep their current values
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        #[arg(long, value_name = "PATH")]
        content_file: Option<PathBuf>,
        #[arg(long = "cover-image-url", value_name = "URL")]
        cover_image_url: Option<String>,
        /// Upload this file and use it as the cover image
        #[arg(long, value_name = "PATH")]
        cover_file: Option<PathBuf>,
        /// Flip the selection of a category id (repeatable)
        #[arg(long = "toggle-category", value_name = "ID")]
        toggle_categories: Vec<String>,
    },
    /// Delete a post, then print the refreshed post list
    Delete { id: String },
}

#[derive(Parser, Debug)]
pub struct UploadsArgs {
    #[command(subcommand)]
    pub action: UploadsCmd,
}

#[derive(Subcommand, Debug)]
pub enum UploadsCmd {
    /// Upload a cover image and print its public URL
    Cover { file: PathBuf },
}
