use clap::{Args, Parser, Subcommand};

use crate::entity::CommentParent;
use crate::error::{GalaxyError, Result};

#[derive(Parser, Debug)]
#[command(name = "galaxy")]
#[command(version, about = "Content store for the Sunny's Galaxy portfolio")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new galaxy store in the current directory
    Init,

    /// Manage portfolio projects
    #[command(subcommand)]
    Project(ProjectAction),

    /// Manage learning resources
    #[command(subcommand)]
    Resource(ResourceAction),

    /// Read and write reviews
    #[command(subcommand)]
    Review(ReviewAction),

    /// Manage stored visitor profiles (admin)
    #[command(subcommand)]
    User(UserAction),

    /// Comment threads on projects and resources
    #[command(subcommand)]
    Comment(CommentAction),

    /// Files embedded in projects and resources (admin)
    #[command(subcommand)]
    Attachment(AttachmentAction),

    /// The about page
    #[command(subcommand)]
    About(AboutAction),

    /// Log in as the site admin
    Login {
        /// Admin user id
        user_id: String,

        /// Admin password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Clear the current session
    Logout,

    /// Show the current session
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fill in your visitor profile (logs you in as a regular user)
    Profile(ProfileArgs),

    /// Show the change log
    Changes {
        /// Only changes to this entity type (project, resource, review, user)
        #[arg(long)]
        entity: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export projects, resources, reviews, profiles and the change log
    Export {
        /// Directory to write the export file into
        #[arg(long, default_value = ".")]
        out: std::path::PathBuf,
    },
}

/// Exactly one of `--project` / `--resource`
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct ParentArgs {
    /// Parent project id
    #[arg(long)]
    pub project: Option<String>,

    /// Parent resource id
    #[arg(long)]
    pub resource: Option<String>,
}

impl ParentArgs {
    pub fn parent(&self) -> Result<CommentParent> {
        match (&self.project, &self.resource) {
            (Some(id), None) => Ok(CommentParent::Project(id.clone())),
            (None, Some(id)) => Ok(CommentParent::Resource(id.clone())),
            _ => Err(GalaxyError::InvalidEntityType(
                "pass exactly one of --project or --resource".to_string(),
            )),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ProjectAction {
    /// List projects
    List {
        /// Only projects in this category
        #[arg(long)]
        category: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one project
    Get {
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a project (admin)
    Add {
        title: String,

        #[command(flatten)]
        fields: ProjectFields,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update a project (admin)
    Update {
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        fields: ProjectFields,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a project (admin)
    Delete {
        id: String,

        /// Skip confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },
    /// Like a project
    Like { id: String },
    /// List the distinct project categories
    Categories,
}

#[derive(Args, Debug, Default)]
pub struct ProjectFields {
    /// Description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Image URL
    #[arg(long)]
    pub image: Option<String>,

    /// Category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Tech stack entries (can be specified multiple times)
    #[arg(long = "tech", short = 't')]
    pub tech_stack: Vec<String>,

    /// Live demo link
    #[arg(long)]
    pub demo: Option<String>,

    /// Source repository link
    #[arg(long)]
    pub github: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ResourceAction {
    /// List resources
    List {
        /// Only resources in this category
        #[arg(long)]
        category: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one resource
    Get {
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a resource (admin)
    Add {
        title: String,

        #[command(flatten)]
        fields: ResourceFields,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update a resource (admin)
    Update {
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        fields: ResourceFields,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a resource (admin)
    Delete {
        id: String,

        /// Skip confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },
    /// Like a resource
    Like { id: String },
    /// List the distinct resource categories
    Categories,
}

#[derive(Args, Debug, Default)]
pub struct ResourceFields {
    /// Description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Resource type (article, video, tool, ...)
    #[arg(long = "type")]
    pub resource_type: Option<String>,

    /// Category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Link
    #[arg(long)]
    pub link: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ReviewAction {
    /// List reviews with the average rating
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one review
    Get {
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Leave a review
    Add {
        /// Reviewer name
        name: String,

        /// Review text
        #[arg(long, short = 'm')]
        message: String,

        /// Rating from 1 to 5
        #[arg(long, short = 'r')]
        rating: u8,

        /// Reviewer role or title
        #[arg(long, default_value = "")]
        role: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update a review (admin)
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, short = 'm')]
        message: Option<String>,

        #[arg(long, short = 'r')]
        rating: Option<u8>,

        #[arg(long)]
        role: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a review (admin)
    Delete {
        id: String,

        /// Skip confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    /// List stored profiles
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one profile
    Get {
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a profile
    Delete {
        id: String,

        /// Skip confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Your name
    pub name: String,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub age: Option<u32>,

    #[arg(long)]
    pub gender: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub occupation: Option<String>,

    #[arg(long)]
    pub bio: Option<String>,

    /// Interests (can be specified multiple times)
    #[arg(long = "interest", short = 'i')]
    pub interests: Vec<String>,

    /// Profile picture file, embedded as a data URI
    #[arg(long)]
    pub picture: Option<std::path::PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum CommentAction {
    /// List the comment thread
    List {
        #[command(flatten)]
        parent: ParentArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Post a comment
    Add {
        text: String,

        #[command(flatten)]
        parent: ParentArgs,

        /// Display name (defaults to your profile, or asks)
        #[arg(long)]
        author: Option<String>,

        /// Files to attach (can be specified multiple times)
        #[arg(long = "attach")]
        attachments: Vec<std::path::PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reply to a comment
    Reply {
        comment_id: String,
        text: String,

        #[command(flatten)]
        parent: ParentArgs,

        /// Display name (defaults to your profile, or asks)
        #[arg(long)]
        author: Option<String>,
    },
    /// Like a comment
    Like {
        comment_id: String,

        #[command(flatten)]
        parent: ParentArgs,
    },
    /// Like a reply
    LikeReply {
        comment_id: String,
        reply_id: String,

        #[command(flatten)]
        parent: ParentArgs,
    },
    /// Delete a comment (admin)
    Delete {
        comment_id: String,

        #[command(flatten)]
        parent: ParentArgs,
    },
    /// Delete a reply (admin)
    DeleteReply {
        comment_id: String,
        reply_id: String,

        #[command(flatten)]
        parent: ParentArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum AttachmentAction {
    /// Embed a file
    Add {
        file: std::path::PathBuf,

        #[command(flatten)]
        parent: ParentArgs,
    },
    /// Remove an embedded file
    Remove {
        attachment_id: String,

        #[command(flatten)]
        parent: ParentArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum AboutAction {
    /// Show the about page
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace the bio (admin)
    SetBio { bio: String },
    /// Add or replace a skill (admin)
    AddSkill {
        name: String,

        /// Proficiency 0-100
        level: u8,
    },
    /// Append a work experience entry (admin)
    AddExperience {
        title: String,

        #[arg(long)]
        company: String,

        #[arg(long)]
        period: String,

        #[arg(long, default_value = "")]
        description: String,
    },
    /// Set a social link, e.g. `github https://github.com/me` (admin)
    SetLink { name: String, url: String },
}
