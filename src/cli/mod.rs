mod commands;
mod handlers;

pub use commands::{
    AboutAction, AttachmentAction, Cli, CommentAction, Commands, ParentArgs, ProfileArgs,
    ProjectAction, ProjectFields, ResourceAction, ResourceFields, ReviewAction, UserAction,
};
pub use handlers::{
    handle_about, handle_attachment, handle_comment, handle_export, handle_changes, handle_init,
    handle_login, handle_logout, handle_profile, handle_project, handle_resource, handle_review,
    handle_user, handle_whoami,
};
