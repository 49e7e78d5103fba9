use clap::Args;
use riskwizard_core::{Catalog, SCORE_OPTIONS};

#[derive(Args)]
pub struct CatalogArgs {
    /// Print the catalog as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: CatalogArgs) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::builtin();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    for (index, category) in catalog.categories().iter().enumerate() {
        println!(
            "{}. {} [{}] (max {})",
            index + 1,
            category.title,
            category.id,
            category.max_score()
        );
        for question in &category.questions {
            println!("   {:<22} {}", question.id, question.text);
        }
    }
    println!();
    for option in SCORE_OPTIONS {
        println!("{} = {}", option.value, option.label);
    }
    println!(
        "{} questions, maximum total score {}",
        catalog.question_count(),
        catalog.max_score()
    );
    Ok(())
}
