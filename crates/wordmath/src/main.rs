use clap::Parser;
use std::path::PathBuf;
use wordmath::{WordVectors, analogy};

#[derive(Parser, Debug)]
#[command(name = "wordmath", version, about = "Word-vector arithmetic from the terminal", long_about = None)]
struct Cli {
    /// Analogy expression, e.g. "king - man + woman"
    expression: String,

    /// Word2vec text-format embeddings file (built-in demo set when omitted)
    #[arg(short, long)]
    embeddings: Option<PathBuf>,

    /// Number of neighbors to print
    #[arg(short = 'n', long, default_value_t = 5)]
    top: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let vectors = match &cli.embeddings {
        Some(path) => WordVectors::load(path)?,
        None => {
            log::info!("no embeddings file given, using the built-in demo set");
            WordVectors::demo()
        }
    };

    let analogy = analogy::parse(&cli.expression)?;
    let ranked = vectors.most_similar(
        &analogy.positives,
        &analogy.negatives,
        cli.top + analogy.operand_count(),
    )?;

    for (word, score) in ranked
        .iter()
        .filter(|(word, _)| !analogy.is_operand(word))
        .take(cli.top)
    {
        println!("{word}  {:.2}%", score * 100.0);
    }
    Ok(())
}
