use std::path::{Path, PathBuf};

use blogsphere::config::{ClientConfig, ConfigError};
use blogsphere::net::types::{Credentials, ImageUpload, PostForm, PostStatus, SignupForm};
use blogsphere::posts;
use blogsphere::routes::Navigation;
use blogsphere::{ApiError, App};
use clap::{Args, Parser, Subcommand};


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("{code}: {0}", code = .0.error_code())]
    Api(#[from] ApiError),
    #[error("missing credentials; pass --email/--password or set BLOG_EMAIL/BLOG_PASSWORD")]
    MissingCredentials,
    #[error("login accepted but the server returned no profile")]
    NoProfile,
    #[error("post {0} not found")]
    PostNotFound(String),
    #[error("unsupported image type for {} (expected png, jpg, jpeg or gif)", .0.display())]
    UnsupportedImage(PathBuf),
    #[error("could not read {}: {source}", .path.display())]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "blogsphere", about = "BlogSphere API client")]
struct Cli {
    /// Overrides the base URL picked from BLOG_DEPLOYMENT.
    #[arg(long, env = "BLOG_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "BLOG_EMAIL")]
    email: Option<String>,

    #[arg(long, env = "BLOG_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the user the server resolves for this session.
    Whoami,
    /// Create an account with --email/--password and log in.
    Signup {
        #[arg(long)]
        fullname: String,
        #[arg(long)]
        username: String,
    },
    /// End the server session.
    Logout,
    /// Show where navigating to a client path would land.
    Visit { path: String },
    Posts(PostsCommand),
}

#[derive(Args, Debug)]
struct PostsCommand {
    #[command(subcommand)]
    command: PostsSubcommand,
}

#[derive(Subcommand, Debug)]
enum PostsSubcommand {
    /// All active posts, newest first.
    All,
    Active,
    Inactive,
    Get {
        post_id: String,
    },
    Create(PostFields),
    Update {
        post_id: String,
        #[command(flatten)]
        fields: PostFields,
    },
    Delete {
        post_id: String,
    },
    /// Resolve a stored image id to a URL.
    Preview {
        file_id: String,
    },
}

#[derive(Args, Debug)]
struct PostFields {
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    content: String,
    #[arg(long, default_value_t = false)]
    inactive: bool,
    #[arg(long)]
    image: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = ClientConfig::new(base_url)?.base_url;
    }

    let app = App::start(&config).await?;
    let credentials = match (cli.email, cli.password) {
        (Some(email), Some(password)) => Some(Credentials { email, password }),
        _ => None,
    };

    match cli.command {
        Command::Signup { fullname, username } => {
            let Credentials { email, password } = credentials.ok_or(CliError::MissingCredentials)?;
            let form = SignupForm { fullname, username, email, password };
            let user = app.signup(&form).await?.ok_or(CliError::NoProfile)?;
            print_json(&user)
        }
        command => {
            if let Some(credentials) = &credentials {
                if !app.session().is_authenticated() {
                    app.login(credentials).await?.ok_or(CliError::NoProfile)?;
                }
            }
            run_command(&app, command).await
        }
    }
}

async fn run_command(app: &App, command: Command) -> Result<(), CliError> {
    match command {
        Command::Whoami => run_whoami(app),
        Command::Logout => {
            app.logout().await?;
            println!("logged out");
            Ok(())
        }
        Command::Visit { path } => {
            run_visit(app, &path);
            Ok(())
        }
        Command::Posts(posts) => run_posts(app, posts).await,
        Command::Signup { .. } => Ok(()),
    }
}

fn run_whoami(app: &App) -> Result<(), CliError> {
    match app.session().snapshot().user_data() {
        Some(user) => print_json(user),
        None => {
            println!("not logged in");
            Ok(())
        }
    }
}

fn run_visit(app: &App, path: &str) {
    match app.navigate(path) {
        Navigation::Render(route) => println!("render {route}"),
        Navigation::Redirect { to, from: Some(from) } => println!("redirect {to} (from {from})"),
        Navigation::Redirect { to, from: None } => println!("redirect {to}"),
        Navigation::NotFound => println!("not found"),
    }
}

async fn run_posts(app: &App, command: PostsCommand) -> Result<(), CliError> {
    let api = app.api();
    match command.command {
        PostsSubcommand::All => {
            let mut list = app.call(api.all_posts()).await?;
            posts::sort_latest_first(&mut list);
            print_json(&list)
        }
        PostsSubcommand::Active => print_json(&app.call(api.active_posts()).await?),
        PostsSubcommand::Inactive => print_json(&app.call(api.inactive_posts()).await?),
        PostsSubcommand::Get { post_id } => {
            let post = app
                .call(api.get_post(&post_id))
                .await?
                .ok_or_else(|| CliError::PostNotFound(post_id.clone()))?;
            print_json(&post)
        }
        PostsSubcommand::Create(fields) => {
            let form = post_form(fields)?;
            print_json(&app.call(api.create_post(form)).await?)
        }
        PostsSubcommand::Update { post_id, fields } => {
            let form = post_form(fields)?;
            print_json(&app.call(api.update_post(&post_id, form)).await?)
        }
        PostsSubcommand::Delete { post_id } => {
            app.call(api.delete_post(&post_id)).await?;
            println!("deleted {post_id}");
            Ok(())
        }
        PostsSubcommand::Preview { file_id } => {
            let preview = app.call(api.file_preview(&file_id)).await?;
            println!("{}", preview.url);
            Ok(())
        }
    }
}

fn post_form(fields: PostFields) -> Result<PostForm, CliError> {
    let image = fields.image.as_deref().map(read_image).transpose()?;
    Ok(PostForm {
        title: fields.title,
        content: fields.content,
        status: if fields.inactive { PostStatus::Inactive } else { PostStatus::Active },
        image,
    })
}

fn read_image(path: &Path) -> Result<ImageUpload, CliError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let mime = match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => return Err(CliError::UnsupportedImage(path.to_path_buf())),
    };
    let bytes = std::fs::read(path).map_err(|source| CliError::ReadFile { path: path.to_path_buf(), source })?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_owned(), |n| n.to_string_lossy().into_owned());
    Ok(ImageUpload { file_name, mime: mime.to_owned(), bytes })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
