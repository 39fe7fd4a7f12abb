use blog_client::BlogClientHttp;
use clap::Parser;

#[derive(Parser, Debug)]
#[clap(about = "Command line client for the blog post service")]
struct Cli {
    #[clap(short, long, default_value = "http://127.0.0.1:8080")]
    server: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Checks that the server is up.
    Sanity,
    ListPosts,
    CreatePost {
        #[clap(long)]
        title: String,
        #[clap(long)]
        body: String,
    },
    DeletePost {
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    let client = BlogClientHttp::connect(&args.server)?;

    match args.command {
        Command::Sanity => {
            println!("{}", client.sanity().await?);
        }
        Command::ListPosts => {
            let posts = client.list_posts().await?;
            println!("Posts ({})", posts.len());
            for post in posts {
                println!("- [{}] {}", post.post_id, post.title);
            }
        }
        Command::CreatePost { title, body } => {
            let post = client.create_post(title, body).await?;
            println!("Post created! ID: {}", post.post_id);
        }
        Command::DeletePost { id } => {
            client.delete_post(id).await?;
            println!("Post deleted!")
        }
    }

    Ok(())
}
