use std::env;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::commands::{
    AboutAction, AttachmentAction, CommentAction, ParentArgs, ProfileArgs, ProjectAction,
    ProjectFields, ResourceAction, ResourceFields, ReviewAction, UserAction,
};
use crate::config::GalaxyConfig;
use crate::entity::{
    AboutContent, Attachment, Comment, CommentParent, EntityType, Experience, Project, Reply,
    Resource, Review, Skill, UserDetails,
};
use crate::error::{GalaxyError, Result};
use crate::service::{DataService, ProjectUpdate, ResourceUpdate, ReviewUpdate};
use crate::session::{display_name_or_anonymous, NamePrompts, Session, SessionState};
use crate::storage::{FileStorage, GALAXY_DIR};

type Service = DataService<FileStorage>;

/// Find the project root by looking for .galaxy/
fn find_project_root() -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let mut current = cwd.as_path();
    loop {
        if current.join(GALAXY_DIR).is_dir() {
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return cwd,
        }
    }
}

fn open_service() -> Result<Service> {
    let root = find_project_root();
    let storage = FileStorage::open(&root)?;
    Ok(DataService::with_config(storage, &GalaxyConfig::from_env()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Match an exact id first, then a unique id prefix.
fn resolve_id<'a>(ids: impl Iterator<Item = &'a str>, input: &str, kind: &str) -> Result<String> {
    let mut matches = Vec::new();
    for id in ids {
        if id == input {
            return Ok(id.to_string());
        }
        if id.starts_with(input) {
            matches.push(id);
        }
    }

    match matches.as_slice() {
        [only] => Ok(only.to_string()),
        [] => Err(GalaxyError::EntityNotFound(format!("{} {}", kind, input))),
        _ => Err(GalaxyError::EntityNotFound(format!(
            "{} {} is ambiguous ({} matches)",
            kind,
            input,
            matches.len()
        ))),
    }
}

fn resolve_project(svc: &Service, input: &str) -> Result<String> {
    let projects = svc.get_all_projects()?;
    resolve_id(projects.iter().map(|p| p.id.as_str()), input, "project")
}

fn resolve_resource(svc: &Service, input: &str) -> Result<String> {
    let resources = svc.get_all_resources()?;
    resolve_id(resources.iter().map(|r| r.id.as_str()), input, "resource")
}

fn resolve_review(svc: &Service, input: &str) -> Result<String> {
    let reviews = svc.get_all_reviews()?;
    resolve_id(reviews.iter().map(|r| r.id.as_str()), input, "review")
}

fn resolve_user(svc: &Service, input: &str) -> Result<String> {
    let users = svc.get_all_user_details()?;
    resolve_id(users.iter().map(|u| u.id.as_str()), input, "user")
}

fn resolve_parent(svc: &Service, args: &ParentArgs) -> Result<CommentParent> {
    Ok(match args.parent()? {
        CommentParent::Project(id) => CommentParent::Project(resolve_project(svc, &id)?),
        CommentParent::Resource(id) => CommentParent::Resource(resolve_resource(svc, &id)?),
    })
}

fn resolve_comment(svc: &Service, parent: &CommentParent, input: &str) -> Result<Comment> {
    let comments = svc.get_comments(parent)?;
    let id = resolve_id(comments.iter().map(|c| c.id.as_str()), input, "comment")?;
    comments
        .into_iter()
        .find(|c| c.id == id)
        .ok_or(GalaxyError::EntityNotFound(id))
}

/// Ask for confirmation on a tty; refuse in non-interactive mode without --force.
fn confirm(prompt: &str, force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }

    eprintln!("{} [y/N] ", prompt);
    if atty::is(atty::Stream::Stdin) {
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().eq_ignore_ascii_case("y"))
    } else {
        Err(GalaxyError::Storage(
            "Use --force to delete in non-interactive mode".to_string(),
        ))
    }
}

/// Ask for a display name through the prompt queue.
fn ask_display_name() -> Result<String> {
    let prompts = NamePrompts::new();
    let answer = prompts.ask_user_name();

    if atty::is(atty::Stream::Stdin) {
        eprint!("Your name (leave blank to stay anonymous): ");
        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        if input.trim().is_empty() {
            prompts.cancel();
        } else {
            prompts.submit(&input);
        }
    } else {
        prompts.cancel();
    }

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    Ok(display_name_or_anonymous(runtime.block_on(answer)))
}

/// Name and owning user id to stamp on a comment or reply.
fn resolve_author(
    svc: &Service,
    session: &Session<'_, FileStorage>,
    author: Option<String>,
) -> Result<(String, Option<String>)> {
    let user = session.current_user()?;
    let user_id = user.as_ref().map(|u| u.id.clone());

    if let Some(name) = author {
        return Ok((name, user_id));
    }
    if let Some(user) = user {
        return Ok((user.name, user_id));
    }
    if session.is_admin() {
        return Ok((svc.get_admin_credentials()?.user_id, None));
    }
    Ok((ask_display_name()?, None))
}

/// Identity recorded in `likedBy`.
fn liker_id(svc: &Service, session: &Session<'_, FileStorage>) -> Result<String> {
    match session.state() {
        SessionState::User { user_id: Some(id) } => Ok(id.clone()),
        SessionState::Admin => Ok(svc.get_admin_credentials()?.user_id),
        _ => Err(GalaxyError::PermissionDenied(
            "set up a profile with 'galaxy profile' before liking".to_string(),
        )),
    }
}

pub fn handle_init() -> Result<()> {
    let root = env::current_dir()?;

    let _storage = FileStorage::init(&root)?;

    println!("Initialized galaxy store in {}", root.display());
    Ok(())
}

// ----------------------------------------------------------------------
// Projects
// ----------------------------------------------------------------------

fn print_project_line(p: &Project) {
    let category = if p.category.is_empty() { "-" } else { p.category.as_str() };
    println!(
        "  ({}) [{}] {}  ♥{}",
        short_id(&p.id),
        category,
        p.title,
        p.likes
    );
    if !p.tech_stack.is_empty() {
        println!("      stack: {}", p.tech_stack.join(", "));
    }
}

pub fn handle_project(action: ProjectAction) -> Result<()> {
    let svc = open_service()?;
    let session = Session::restore(&svc)?;

    match action {
        ProjectAction::List { category, json } => {
            let projects = match category {
                Some(ref c) => svc.projects_by_category(c)?,
                None => svc.get_all_projects()?,
            };
            if json {
                print_json(&projects)?;
            } else if projects.is_empty() {
                println!("No projects found.");
            } else {
                println!("Projects:\n");
                projects.iter().for_each(print_project_line);
            }
        }
        ProjectAction::Get { id, json } => {
            let id = resolve_project(&svc, &id)?;
            let p = svc
                .get_project_by_id(&id)?
                .ok_or(GalaxyError::EntityNotFound(id))?;
            if json {
                print_json(&p)?;
            } else {
                println!("Project ({})", p.id);
                println!("Title: {}", p.title);
                if !p.category.is_empty() {
                    println!("Category: {}", p.category);
                }
                if !p.tech_stack.is_empty() {
                    println!("Stack: {}", p.tech_stack.join(", "));
                }
                if let Some(ref demo) = p.demo_link {
                    println!("Demo: {}", demo);
                }
                if let Some(ref github) = p.github_link {
                    println!("Source: {}", github);
                }
                println!("Likes: {}", p.likes);
                println!("Comments: {}", p.comments.len());
                println!("\n{}", p.description);
            }
        }
        ProjectAction::Add {
            title,
            fields,
            json,
        } => {
            session.require_admin("adding projects")?;
            let mut project = Project::new(title, fields.description.unwrap_or_default());
            project.image = fields.image.unwrap_or_default();
            project.category = fields.category.unwrap_or_default();
            project.tech_stack = fields.tech_stack;
            project.demo_link = fields.demo;
            project.github_link = fields.github;

            let project = svc.add_project(project)?;
            if json {
                print_json(&project)?;
            } else {
                println!("Created project ({}) - {}", short_id(&project.id), project.title);
            }
        }
        ProjectAction::Update {
            id,
            title,
            fields,
            json,
        } => {
            session.require_admin("editing projects")?;
            let id = resolve_project(&svc, &id)?;
            let update = project_update(title, fields);
            let project = svc
                .update_project(&id, update)?
                .ok_or(GalaxyError::EntityNotFound(id))?;
            if json {
                print_json(&project)?;
            } else {
                println!("Updated project ({}) - {}", short_id(&project.id), project.title);
            }
        }
        ProjectAction::Delete { id, force } => {
            session.require_admin("deleting projects")?;
            let id = resolve_project(&svc, &id)?;
            let Some(project) = svc.get_project_by_id(&id)? else {
                return Err(GalaxyError::EntityNotFound(id));
            };
            if !confirm(
                &format!("Delete project ({}) - {}?", short_id(&id), project.title),
                force,
            )? {
                println!("Cancelled.");
                return Ok(());
            }
            if !svc.delete_project(&id)? {
                return Err(GalaxyError::EntityNotFound(id));
            }
            println!("Deleted project ({}) - {}", short_id(&id), project.title);
        }
        ProjectAction::Like { id } => {
            let id = resolve_project(&svc, &id)?;
            let likes = svc
                .like_project(&id)?
                .ok_or(GalaxyError::EntityNotFound(id))?;
            println!("♥ {}", likes);
        }
        ProjectAction::Categories => {
            for category in svc.project_categories()? {
                println!("{}", category);
            }
        }
    }

    Ok(())
}

fn project_update(title: Option<String>, fields: ProjectFields) -> ProjectUpdate {
    ProjectUpdate {
        title,
        description: fields.description,
        image: fields.image,
        category: fields.category,
        tech_stack: (!fields.tech_stack.is_empty()).then_some(fields.tech_stack),
        demo_link: fields.demo.map(Some),
        github_link: fields.github.map(Some),
    }
}

// ----------------------------------------------------------------------
// Resources
// ----------------------------------------------------------------------

pub fn handle_resource(action: ResourceAction) -> Result<()> {
    let svc = open_service()?;
    let session = Session::restore(&svc)?;

    match action {
        ResourceAction::List { category, json } => {
            let resources = match category {
                Some(ref c) => svc.resources_by_category(c)?,
                None => svc.get_all_resources()?,
            };
            if json {
                print_json(&resources)?;
            } else if resources.is_empty() {
                println!("No resources found.");
            } else {
                println!("Resources:\n");
                for r in resources {
                    let kind = if r.resource_type.is_empty() { "-" } else { r.resource_type.as_str() };
                    println!("  ({}) [{}] {}  ♥{}", short_id(&r.id), kind, r.title, r.likes);
                    if !r.link.is_empty() {
                        println!("      {}", r.link);
                    }
                }
            }
        }
        ResourceAction::Get { id, json } => {
            let id = resolve_resource(&svc, &id)?;
            let r = svc
                .get_resource_by_id(&id)?
                .ok_or(GalaxyError::EntityNotFound(id))?;
            if json {
                print_json(&r)?;
            } else {
                println!("Resource ({})", r.id);
                println!("Title: {}", r.title);
                if !r.resource_type.is_empty() {
                    println!("Type: {}", r.resource_type);
                }
                if !r.category.is_empty() {
                    println!("Category: {}", r.category);
                }
                if !r.link.is_empty() {
                    println!("Link: {}", r.link);
                }
                println!("Likes: {}", r.likes);
                println!("Attachments: {}", r.attachments.len());
                println!("\n{}", r.description);
            }
        }
        ResourceAction::Add {
            title,
            fields,
            json,
        } => {
            session.require_admin("adding resources")?;
            let mut resource = Resource::new(title, fields.description.unwrap_or_default());
            resource.resource_type = fields.resource_type.unwrap_or_default();
            resource.category = fields.category.unwrap_or_default();
            resource.link = fields.link.unwrap_or_default();

            let resource = svc.add_resource(resource)?;
            if json {
                print_json(&resource)?;
            } else {
                println!("Created resource ({}) - {}", short_id(&resource.id), resource.title);
            }
        }
        ResourceAction::Update {
            id,
            title,
            fields,
            json,
        } => {
            session.require_admin("editing resources")?;
            let id = resolve_resource(&svc, &id)?;
            let update = resource_update(title, fields);
            let resource = svc
                .update_resource(&id, update)?
                .ok_or(GalaxyError::EntityNotFound(id))?;
            if json {
                print_json(&resource)?;
            } else {
                println!("Updated resource ({}) - {}", short_id(&resource.id), resource.title);
            }
        }
        ResourceAction::Delete { id, force } => {
            session.require_admin("deleting resources")?;
            let id = resolve_resource(&svc, &id)?;
            let Some(resource) = svc.get_resource_by_id(&id)? else {
                return Err(GalaxyError::EntityNotFound(id));
            };
            if !confirm(
                &format!("Delete resource ({}) - {}?", short_id(&id), resource.title),
                force,
            )? {
                println!("Cancelled.");
                return Ok(());
            }
            if !svc.delete_resource(&id)? {
                return Err(GalaxyError::EntityNotFound(id));
            }
            println!("Deleted resource ({}) - {}", short_id(&id), resource.title);
        }
        ResourceAction::Like { id } => {
            let id = resolve_resource(&svc, &id)?;
            let likes = svc
                .like_resource(&id)?
                .ok_or(GalaxyError::EntityNotFound(id))?;
            println!("♥ {}", likes);
        }
        ResourceAction::Categories => {
            for category in svc.resource_categories()? {
                println!("{}", category);
            }
        }
    }

    Ok(())
}

fn resource_update(title: Option<String>, fields: ResourceFields) -> ResourceUpdate {
    ResourceUpdate {
        title,
        description: fields.description,
        resource_type: fields.resource_type,
        category: fields.category,
        link: fields.link,
        attachments: None,
    }
}

// ----------------------------------------------------------------------
// Reviews
// ----------------------------------------------------------------------

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

pub fn handle_review(action: ReviewAction) -> Result<()> {
    let svc = open_service()?;
    let session = Session::restore(&svc)?;

    match action {
        ReviewAction::List { json } => {
            let reviews = svc.get_all_reviews()?;
            if json {
                print_json(&reviews)?;
            } else if reviews.is_empty() {
                println!("No reviews yet.");
            } else {
                if let Some(avg) = svc.average_rating()? {
                    println!("Reviews ({} total, average {:.1}):\n", reviews.len(), avg);
                }
                for r in reviews {
                    println!("  ({}) {} {} - {}", short_id(&r.id), stars(r.rating), r.name, r.message);
                }
            }
        }
        ReviewAction::Get { id, json } => {
            let id = resolve_review(&svc, &id)?;
            let r = svc
                .get_review_by_id(&id)?
                .ok_or(GalaxyError::EntityNotFound(id))?;
            if json {
                print_json(&r)?;
            } else {
                println!("Review ({})", r.id);
                println!("From: {}", r.name);
                if !r.role.is_empty() {
                    println!("Role: {}", r.role);
                }
                println!("Rating: {}", stars(r.rating));
                println!("Date: {}", r.date.format("%Y-%m-%d"));
                println!("\n{}", r.message);
            }
        }
        ReviewAction::Add {
            name,
            message,
            rating,
            role,
            json,
        } => {
            let mut review = Review::new(name, message, rating);
            review.role = role;
            review.user_id = session.current_user()?.map(|u| u.id);

            let review = svc.add_review(review)?;
            if json {
                print_json(&review)?;
            } else {
                println!("Thanks for the review ({}) {}", short_id(&review.id), stars(review.rating));
            }
        }
        ReviewAction::Update {
            id,
            name,
            message,
            rating,
            role,
            json,
        } => {
            session.require_admin("editing reviews")?;
            let id = resolve_review(&svc, &id)?;
            let update = ReviewUpdate {
                name,
                message,
                rating,
                role,
                ..Default::default()
            };
            let review = svc
                .update_review(&id, update)?
                .ok_or(GalaxyError::EntityNotFound(id))?;
            if json {
                print_json(&review)?;
            } else {
                println!("Updated review ({}) - {}", short_id(&review.id), review.name);
            }
        }
        ReviewAction::Delete { id, force } => {
            session.require_admin("deleting reviews")?;
            let id = resolve_review(&svc, &id)?;
            if !confirm(&format!("Delete review ({})?", short_id(&id)), force)? {
                println!("Cancelled.");
                return Ok(());
            }
            if !svc.delete_review(&id)? {
                return Err(GalaxyError::EntityNotFound(id));
            }
            println!("Deleted review ({})", short_id(&id));
        }
    }

    Ok(())
}

// ----------------------------------------------------------------------
// Users and session
// ----------------------------------------------------------------------

pub fn handle_user(action: UserAction) -> Result<()> {
    let svc = open_service()?;
    let session = Session::restore(&svc)?;
    session.require_admin("managing profiles")?;

    match action {
        UserAction::List { json } => {
            let users = svc.get_all_user_details()?;
            if json {
                print_json(&users)?;
            } else if users.is_empty() {
                println!("No profiles found.");
            } else {
                println!("Profiles:\n");
                for u in users {
                    let email = u.email.as_deref().unwrap_or("-");
                    println!(
                        "  ({}) {} <{}> visited {}",
                        short_id(&u.id),
                        u.name,
                        email,
                        u.visit_date.format("%Y-%m-%d")
                    );
                }
            }
        }
        UserAction::Get { id, json } => {
            let id = resolve_user(&svc, &id)?;
            let u = svc
                .get_user_details_by_id(&id)?
                .ok_or(GalaxyError::EntityNotFound(id))?;
            if json {
                print_json(&u)?;
            } else {
                print_profile(&u);
            }
        }
        UserAction::Delete { id, force } => {
            let id = resolve_user(&svc, &id)?;
            if !confirm(&format!("Delete profile ({})?", short_id(&id)), force)? {
                println!("Cancelled.");
                return Ok(());
            }
            if !svc.delete_user_details(&id)? {
                return Err(GalaxyError::EntityNotFound(id));
            }
            println!("Deleted profile ({})", short_id(&id));
        }
    }

    Ok(())
}

fn print_profile(u: &UserDetails) {
    println!("Profile ({})", u.id);
    println!("Name: {}", u.name);
    let optional = [
        ("Email", u.email.as_deref()),
        ("Gender", u.gender.as_deref()),
        ("Phone", u.phone.as_deref()),
        ("Occupation", u.occupation.as_deref()),
        ("Bio", u.bio.as_deref()),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            println!("{}: {}", label, value);
        }
    }
    if let Some(age) = u.age {
        println!("Age: {}", age);
    }
    if !u.interests.is_empty() {
        println!("Interests: {}", u.interests.join(", "));
    }
    if u.profile_picture.is_some() {
        println!(
            "Picture: yes ({})",
            u.profile_picture_type.as_deref().unwrap_or("unknown")
        );
    }
    println!("Visited: {}", u.visit_date.format("%Y-%m-%d %H:%M"));
}

pub fn handle_login(user_id: String, password: Option<String>) -> Result<()> {
    let svc = open_service()?;
    let mut session = Session::restore(&svc)?;

    let password = match password {
        Some(p) => p,
        None => {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if session.login(&user_id, &password)? {
        println!("Logged in as admin.");
        Ok(())
    } else {
        Err(GalaxyError::PermissionDenied("invalid credentials".to_string()))
    }
}

pub fn handle_logout() -> Result<()> {
    let svc = open_service()?;
    Session::clear(&svc)?;
    println!("Logged out.");
    Ok(())
}

#[derive(Serialize)]
struct WhoAmI {
    authenticated: bool,
    role: Option<String>,
    user: Option<UserDetails>,
}

pub fn handle_whoami(json: bool) -> Result<()> {
    let svc = open_service()?;
    let session = Session::restore(&svc)?;
    let user = session.current_user()?;

    if json {
        return print_json(&WhoAmI {
            authenticated: session.is_authenticated(),
            role: session.role().map(|r| r.to_string()),
            user,
        });
    }

    match (session.state(), user) {
        (SessionState::Admin, _) => println!("admin"),
        (SessionState::User { .. }, Some(u)) => println!("user: {} ({})", u.name, short_id(&u.id)),
        (SessionState::User { .. }, None) => println!("user (profile missing)"),
        (SessionState::Anonymous, _) => println!("anonymous"),
    }
    Ok(())
}

pub fn handle_profile(args: ProfileArgs) -> Result<()> {
    let svc = open_service()?;
    let mut session = Session::restore(&svc)?;

    let mut details = session
        .current_user()?
        .unwrap_or_else(|| UserDetails::new(args.name.clone()));
    details.name = args.name;
    details.email = args.email.or(details.email);
    details.age = args.age.or(details.age);
    details.gender = args.gender.or(details.gender);
    details.phone = args.phone.or(details.phone);
    details.occupation = args.occupation.or(details.occupation);
    details.bio = args.bio.or(details.bio);
    if !args.interests.is_empty() {
        details.interests = args.interests;
    }
    if let Some(path) = args.picture {
        let picture = Attachment::from_file(&path)?;
        if !picture.is_image() {
            return Err(GalaxyError::validation(
                "picture",
                format!("{} is not an image", picture.name),
            ));
        }
        details.profile_picture = Some(picture.url);
        details.profile_picture_type = picture.extension;
    }

    let details = session.set_user_details(details)?;
    if args.json {
        print_json(&details)?;
    } else {
        println!("Welcome, {} ({})", details.name, short_id(&details.id));
    }
    Ok(())
}

// ----------------------------------------------------------------------
// Comments and attachments
// ----------------------------------------------------------------------

fn read_attachments(paths: &[PathBuf]) -> Result<Vec<Attachment>> {
    paths.iter().map(|p| Attachment::from_file(p)).collect()
}

pub fn handle_comment(action: CommentAction) -> Result<()> {
    let svc = open_service()?;
    let session = Session::restore(&svc)?;

    match action {
        CommentAction::List { parent, json } => {
            let parent = resolve_parent(&svc, &parent)?;
            let comments = svc.get_comments(&parent)?;
            if json {
                print_json(&comments)?;
            } else if comments.is_empty() {
                println!("No comments on {}.", parent);
            } else {
                for c in comments {
                    println!(
                        "  ({}) {} [{}] ♥{}",
                        short_id(&c.id),
                        c.author,
                        c.timestamp.format("%Y-%m-%d %H:%M"),
                        c.likes
                    );
                    println!("      {}", c.text);
                    for a in &c.attachments {
                        println!("      📎 {} ({})", a.name, a.kind);
                    }
                    for r in &c.replies {
                        println!("      ↳ ({}) {}: {} ♥{}", short_id(&r.id), r.author, r.text, r.likes);
                    }
                }
            }
        }
        CommentAction::Add {
            text,
            parent,
            author,
            attachments,
            json,
        } => {
            let parent = resolve_parent(&svc, &parent)?;
            let (author, user_id) = resolve_author(&svc, &session, author)?;

            let mut comment = Comment::new(text, author);
            comment.user_id = user_id;
            comment.attachments = read_attachments(&attachments)?;

            let comment = svc
                .add_comment(&parent, comment)?
                .ok_or_else(|| GalaxyError::EntityNotFound(parent.to_string()))?;
            if json {
                print_json(&comment)?;
            } else {
                println!("Commented ({}) on {}", short_id(&comment.id), parent);
            }
        }
        CommentAction::Reply {
            comment_id,
            text,
            parent,
            author,
        } => {
            let parent = resolve_parent(&svc, &parent)?;
            let comment = resolve_comment(&svc, &parent, &comment_id)?;
            let (author, user_id) = resolve_author(&svc, &session, author)?;

            let mut reply = Reply::new(text, author);
            reply.user_id = user_id;

            let reply = svc
                .add_reply(&parent, &comment.id, reply)?
                .ok_or(GalaxyError::EntityNotFound(comment.id))?;
            println!("Replied ({})", short_id(&reply.id));
        }
        CommentAction::Like { comment_id, parent } => {
            let parent = resolve_parent(&svc, &parent)?;
            let comment = resolve_comment(&svc, &parent, &comment_id)?;
            let liker = liker_id(&svc, &session)?;

            if comment.is_liked_by(&liker) {
                println!("Already liked.");
                return Ok(());
            }
            if !svc.like_comment(&parent, &comment.id, &liker)? {
                return Err(GalaxyError::EntityNotFound(comment.id));
            }
            println!("♥ {}", comment.likes + 1);
        }
        CommentAction::LikeReply {
            comment_id,
            reply_id,
            parent,
        } => {
            let parent = resolve_parent(&svc, &parent)?;
            let comment = resolve_comment(&svc, &parent, &comment_id)?;
            let liker = liker_id(&svc, &session)?;

            let reply_id = resolve_id(
                comment.replies.iter().map(|r| r.id.as_str()),
                &reply_id,
                "reply",
            )?;
            let already = comment
                .replies
                .iter()
                .any(|r| r.id == reply_id && r.is_liked_by(&liker));
            if already {
                println!("Already liked.");
                return Ok(());
            }
            if !svc.like_reply(&parent, &comment.id, &reply_id, &liker)? {
                return Err(GalaxyError::EntityNotFound(reply_id));
            }
            println!("Liked reply ({})", short_id(&reply_id));
        }
        CommentAction::Delete { comment_id, parent } => {
            session.require_admin("deleting comments")?;
            let parent = resolve_parent(&svc, &parent)?;
            let comment = resolve_comment(&svc, &parent, &comment_id)?;
            if !svc.delete_comment(&parent, &comment.id)? {
                return Err(GalaxyError::EntityNotFound(comment.id));
            }
            println!("Deleted comment ({})", short_id(&comment.id));
        }
        CommentAction::DeleteReply {
            comment_id,
            reply_id,
            parent,
        } => {
            session.require_admin("deleting replies")?;
            let parent = resolve_parent(&svc, &parent)?;
            let comment = resolve_comment(&svc, &parent, &comment_id)?;
            let reply_id = resolve_id(
                comment.replies.iter().map(|r| r.id.as_str()),
                &reply_id,
                "reply",
            )?;
            if !svc.delete_reply(&parent, &comment.id, &reply_id)? {
                return Err(GalaxyError::EntityNotFound(reply_id));
            }
            println!("Deleted reply ({})", short_id(&reply_id));
        }
    }

    Ok(())
}

pub fn handle_attachment(action: AttachmentAction) -> Result<()> {
    let svc = open_service()?;
    let session = Session::restore(&svc)?;
    session.require_admin("managing attachments")?;

    match action {
        AttachmentAction::Add { file, parent } => {
            let parent = resolve_parent(&svc, &parent)?;
            let attachment = Attachment::from_file(&file)?;
            let attachment = svc
                .add_attachment(&parent, attachment)?
                .ok_or_else(|| GalaxyError::EntityNotFound(parent.to_string()))?;
            println!(
                "Attached {} ({}) to {} [{}]",
                attachment.name,
                attachment.kind,
                parent,
                short_id(&attachment.id)
            );
        }
        AttachmentAction::Remove {
            attachment_id,
            parent,
        } => {
            let parent = resolve_parent(&svc, &parent)?;
            if !svc.remove_attachment(&parent, &attachment_id)? {
                return Err(GalaxyError::EntityNotFound(attachment_id));
            }
            println!("Removed attachment {}", attachment_id);
        }
    }

    Ok(())
}

// ----------------------------------------------------------------------
// About, change log, export
// ----------------------------------------------------------------------

fn print_about(about: &AboutContent) {
    println!("{}", if about.bio.is_empty() { "(no bio yet)" } else { about.bio.as_str() });
    if let Some(ref links) = about.social_links {
        println!();
        for (name, url) in links {
            println!("  {}: {}", name, url);
        }
    }
    if !about.experiences.is_empty() {
        println!("\nExperience:");
        for e in &about.experiences {
            println!("  {} @ {} ({})", e.title, e.company, e.period);
            if !e.description.is_empty() {
                println!("      {}", e.description);
            }
        }
    }
    if !about.skills.is_empty() {
        println!("\nSkills:");
        for s in &about.skills {
            println!("  {:<20} {:>3}%", s.name, s.level);
        }
    }
}

pub fn handle_about(action: AboutAction) -> Result<()> {
    let svc = open_service()?;
    let session = Session::restore(&svc)?;

    let mut about = svc.get_about_content()?;
    match action {
        AboutAction::Show { json } => {
            if json {
                return print_json(&about);
            }
            print_about(&about);
            return Ok(());
        }
        AboutAction::SetBio { bio } => {
            session.require_admin("editing the about page")?;
            about.bio = bio;
        }
        AboutAction::AddSkill { name, level } => {
            session.require_admin("editing the about page")?;
            match about.skills.iter_mut().find(|s| s.name.eq_ignore_ascii_case(&name)) {
                Some(skill) => skill.level = level,
                None => about.skills.push(Skill { name, level }),
            }
        }
        AboutAction::AddExperience {
            title,
            company,
            period,
            description,
        } => {
            session.require_admin("editing the about page")?;
            about.experiences.push(Experience {
                title,
                company,
                period,
                description,
            });
        }
        AboutAction::SetLink { name, url } => {
            session.require_admin("editing the about page")?;
            about.social_links.get_or_insert_with(Default::default).insert(name, url);
        }
    }

    svc.update_about_content(about)?;
    println!("About page updated.");
    Ok(())
}

pub fn handle_changes(entity: Option<String>, json: bool) -> Result<()> {
    let svc = open_service()?;
    let changes = match entity {
        Some(raw) => {
            let entity_type = raw
                .parse::<EntityType>()
                .map_err(|_| GalaxyError::InvalidEntityType(raw.clone()))?;
            svc.changes_for(entity_type)?
        }
        None => svc.get_database_changes()?,
    };

    if json {
        return print_json(&changes);
    }
    if changes.is_empty() {
        println!("No changes recorded.");
        return Ok(());
    }
    for c in changes {
        println!(
            "  {} {:<6} {:<11} {}",
            c.timestamp.format("%Y-%m-%d %H:%M:%S"),
            c.action.to_string(),
            c.entity_type.to_string(),
            short_id(&c.entity_id)
        );
    }
    Ok(())
}

pub fn handle_export(out: &Path) -> Result<()> {
    let svc = open_service()?;
    let path = svc.write_export(out, chrono::Utc::now().date_naive())?;
    println!("Exported database to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_id_exact_and_prefix() {
        let ids = ["abc123", "abd456", "xyz"];
        assert_eq!(resolve_id(ids.iter().copied(), "xyz", "project").unwrap(), "xyz");
        assert_eq!(resolve_id(ids.iter().copied(), "abc", "project").unwrap(), "abc123");
    }

    #[test]
    fn test_resolve_id_ambiguous_or_missing() {
        let ids = ["abc123", "abd456"];
        assert!(matches!(
            resolve_id(ids.iter().copied(), "ab", "project"),
            Err(GalaxyError::EntityNotFound(msg)) if msg.contains("ambiguous")
        ));
        assert!(matches!(
            resolve_id(ids.iter().copied(), "zz", "project"),
            Err(GalaxyError::EntityNotFound(_))
        ));
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(3), "★★★☆☆");
        assert_eq!(stars(5), "★★★★★");
    }

    #[test]
    fn test_project_update_from_flags() {
        let fields = ProjectFields {
            tech_stack: vec!["Rust".to_string()],
            demo: Some("https://demo".to_string()),
            ..Default::default()
        };
        let update = project_update(None, fields);
        assert_eq!(update.tech_stack, Some(vec!["Rust".to_string()]));
        assert_eq!(update.demo_link, Some(Some("https://demo".to_string())));
        assert!(update.github_link.is_none());
        assert!(update.title.is_none());
    }
}
