use std::time::Duration;

use clap::{Parser, Subcommand};
use log::debug;

use recipe_finder::{CatalogKind, FinderConfig, Recipe, RecipeFinder, Snapshot};

#[derive(Parser)]
#[command(name = "recipe-finder", version, about = "Discover recipes from around the world")]
struct Cli {
    /// Catalog to query (mealdb, spoonacular)
    #[arg(long, global = true)]
    catalog: Option<CatalogKind>,

    /// Override the catalog base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Catalog API key
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Give up on an operation after this many milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show a batch of random recipes
    Random {
        #[arg(short, long)]
        count: Option<usize>,
    },
    /// Search recipes by keyword
    Search { term: String },
    /// Show one recipe in full
    Show { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = FinderConfig::load()?;
    if let Some(kind) = cli.catalog {
        config.catalog.kind = kind;
    }
    if let Some(url) = cli.base_url {
        config.catalog.base_url = Some(url);
    }
    if let Some(key) = cli.api_key {
        config.catalog.api_key = Some(key);
    }

    let mut builder = RecipeFinder::builder().config(config);
    if let Some(ms) = cli.timeout_ms {
        builder = builder.operation_timeout(Duration::from_millis(ms));
    }
    let finder = builder.build()?;
    debug!("Using catalog {}", finder.catalog_name());

    match cli.command {
        Command::Random { count } => {
            match count {
                Some(count) => finder.fetch_random_batch(count).await,
                None => finder.fetch_random().await,
            };
            print_list(&finder.snapshot());
        }
        Command::Search { term } => {
            finder.search(&term).await;
            print_list(&finder.snapshot());
        }
        Command::Show { id } => {
            finder.fetch_details(&id).await;
            print_details(&finder.snapshot());
        }
    }

    Ok(())
}

fn print_list(snapshot: &Snapshot) {
    if let Some(error) = &snapshot.list.error {
        eprintln!("Error: {}", error);
        return;
    }
    if snapshot.list.recipes.is_empty() {
        println!("No recipes found.");
        return;
    }

    for recipe in &snapshot.list.recipes {
        let mut facts = Vec::new();
        if let Some(minutes) = recipe.ready_in_minutes {
            facts.push(format!("{}m", minutes));
        }
        if let Some(servings) = recipe.servings {
            facts.push(format!("{} servings", servings));
        }
        facts.extend(recipe.tags.iter().cloned());

        println!("{:>8}  {}", recipe.id, recipe.title);
        if !facts.is_empty() {
            println!("          {}", facts.join(" · "));
        }
    }
}

fn print_details(snapshot: &Snapshot) {
    if let Some(error) = &snapshot.detail.error {
        eprintln!("Error: {}", error);
        return;
    }
    match &snapshot.detail.selected {
        Some(recipe) => print_recipe(recipe),
        None => println!("No recipe selected."),
    }
}

fn print_recipe(recipe: &Recipe) {
    println!("{}", recipe.title);
    println!("{}", "=".repeat(recipe.title.chars().count()));
    println!("Image: {}", recipe.image_or_placeholder());
    if !recipe.tags.is_empty() {
        println!("Tags: {}", recipe.tags.join(", "));
    }
    if let Some(minutes) = recipe.ready_in_minutes {
        println!("Ready in: {} min", minutes);
    }
    if let Some(servings) = recipe.servings {
        println!("Servings: {}", servings);
    }
    if let Some(likes) = recipe.likes {
        println!("Likes: {}", likes);
    }
    if let Some(summary) = recipe.summary_text() {
        println!("\n{}", summary);
    }

    if !recipe.ingredients.is_empty() {
        println!("\nIngredients:");
        for ingredient in &recipe.ingredients {
            println!("  • {}", ingredient);
        }
    }
    if let Some(instructions) = &recipe.instructions {
        println!("\nInstructions:\n{}", instructions);
    }
    if let Some(video) = &recipe.external_video_url {
        println!("\nVideo: {}", video);
    }
    if let Some(source) = &recipe.source_url {
        println!("Source: {}", source);
    }
}
