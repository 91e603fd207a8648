//! Split command - partition labeled chip images into train/test sets.
//!
//! Mirrors the dataset preparation step of the original workflow: for each
//! class directory under the input root, shuffle the image files and copy a
//! fixed fraction into `train/<class>/`, the remainder into `test/<class>/`.
//! Pure file I/O; the tiling library is not involved.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use crate::error::CliError;

/// Arguments for the split command.
#[derive(Args)]
pub struct SplitArgs {
    /// Input root containing one directory per class.
    #[arg(long, default_value = "data")]
    pub input: PathBuf,

    /// Output root for the train/ and test/ trees.
    #[arg(long, default_value = "dataset")]
    pub output: PathBuf,

    /// Fraction of each class assigned to the training set.
    #[arg(long, default_value_t = 0.8)]
    pub train_ratio: f64,

    /// Class directory names, comma separated.
    #[arg(long, value_delimiter = ',', default_values_t = default_classes())]
    pub classes: Vec<String>,

    /// Seed for the shuffle; random when omitted. The split is
    /// non-deterministic by design unless a seed is pinned.
    #[arg(long)]
    pub seed: Option<u64>,
}

fn default_classes() -> Vec<String> {
    vec!["com_garimpo".to_string(), "sem_garimpo".to_string()]
}

/// Run the split command.
pub fn run(args: SplitArgs) -> Result<(), CliError> {
    if !(args.train_ratio > 0.0 && args.train_ratio < 1.0) {
        return Err(CliError::Config(format!(
            "train ratio must be strictly between 0 and 1, got {}",
            args.train_ratio
        )));
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    for class in &args.classes {
        let class_dir = args.input.join(class);
        let mut images = list_files(&class_dir)?;
        // Sort before shuffling so a pinned seed reproduces the same split
        // regardless of directory iteration order.
        images.sort();
        images.shuffle(&mut rng);

        let split_index = (images.len() as f64 * args.train_ratio) as usize;
        let (train, test) = images.split_at(split_index);

        copy_set(&class_dir, &args.output.join("train").join(class), train, class, "train")?;
        copy_set(&class_dir, &args.output.join("test").join(class), test, class, "test")?;

        info!(
            class = class.as_str(),
            train = train.len(),
            test = test.len(),
            "class split"
        );
    }

    eprintln!("Split complete: {}", args.output.display());
    Ok(())
}

fn list_files(dir: &Path) -> Result<Vec<String>, CliError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    Ok(names)
}

fn copy_set(
    source: &Path,
    destination: &Path,
    names: &[String],
    class: &str,
    subset: &str,
) -> Result<(), CliError> {
    fs::create_dir_all(destination)?;

    let bar = ProgressBar::new(names.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")
            .expect("static template is valid")
            .progress_chars("=> "),
    );
    bar.set_message(format!("{} ({})", class, subset));

    for name in names {
        fs::copy(source.join(name), destination.join(name))?;
        bar.inc(1);
    }
    bar.finish_and_clear();
    Ok(())
}
