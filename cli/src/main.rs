use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use movierec_core::{build_corpus, Recommender, VectorizerOptions, DEFAULT_K};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "movierec")]
#[command(about = "Recommend movies with similar plot, genres and keywords", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the movies most similar to a title
    Recommend {
        /// Movie dataset CSV (id, title, overview, genres, keywords)
        #[arg(long)]
        data: String,
        /// Title to find neighbours for (case-insensitive, exact)
        #[arg(long)]
        title: String,
        /// Number of recommendations
        #[arg(short, long, default_value_t = DEFAULT_K)]
        k: usize,
        /// Print JSON instead of a ranked list
        #[arg(long, default_value_t = false)]
        json: bool,
        #[command(flatten)]
        weighting: Weighting,
    },
    /// List every title in the dataset, sorted
    Titles {
        #[arg(long)]
        data: String,
    },
}

#[derive(Args)]
struct Weighting {
    /// Use IDF = ln(N/df) + 1 instead of the smoothed ln((1+N)/(1+df)) + 1
    #[arg(long, default_value_t = false)]
    no_smooth_idf: bool,
    /// Use tf = 1 + ln(count) instead of the raw count
    #[arg(long, default_value_t = false)]
    sublinear_tf: bool,
    /// Stem terms before weighting
    #[arg(long, default_value_t = false)]
    stem: bool,
}

impl From<Weighting> for VectorizerOptions {
    fn from(w: Weighting) -> Self {
        VectorizerOptions { smooth_idf: !w.no_smooth_idf, sublinear_tf: w.sublinear_tf, stem: w.stem }
    }
}

#[derive(Serialize)]
struct Output<'a> {
    query: &'a str,
    found: bool,
    results: Vec<Hit>,
}

#[derive(Serialize)]
struct Hit {
    rank: usize,
    id: i64,
    title: String,
    score: f32,
    url: String,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Recommend { data, title, k, json, weighting } => {
            run_recommend(&data, &title, k, json, weighting.into())
        }
        Commands::Titles { data } => {
            let corpus = build_corpus(&data)?;
            for title in corpus.titles_sorted() {
                println!("{title}");
            }
            Ok(())
        }
    }
}

fn run_recommend(data: &str, title: &str, k: usize, json: bool, opts: VectorizerOptions) -> Result<()> {
    let rec = Recommender::from_csv(data, &opts)?;
    let found = rec.lookup(title).is_some();
    let results: Vec<Hit> = rec
        .recommend(title, k)
        .into_iter()
        .enumerate()
        .map(|(i, r)| Hit { rank: i + 1, url: r.tmdb_url(), id: r.id, title: r.title, score: r.score })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&Output { query: title, found, results })?);
        return Ok(());
    }
    if !found {
        tracing::warn!(title, "title not in dataset");
        println!("Movie not found: {title}");
        return Ok(());
    }
    println!("Because you liked {title}:");
    for hit in results {
        println!("#{:<3} {} ({:.3})\n     {}", hit.rank, hit.title, hit.score, hit.url);
    }
    Ok(())
}
