//! RK disk tool CLI - manage files on RK-DOS volumes from the command line.
//!
//! Usage:
//!   rkdisk <command> [options] <volume> [file] [target]
//!
//! Examples:
//!   rkdisk format work.rdz -y                 # Create an empty volume
//!   rkdisk add work.rdz xonix.bin -a 3000     # Add a file loading at 0x3000
//!   rkdisk list work.rdz                      # Show the directory
//!   rkdisk extract work.rdz XONIX.BIN x.rk -t # Extract as a tape container
//!   rkdisk x work.rdz NOTES.TXT n.txt --cp utf-8
//!   rkdisk tape prog.bin prog.rk -a 0         # Host file straight to .rk

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use log::debug;

use rk_core::{
    add_from_path, extract_to_path, parse_address, to_rk_dos_name, transcode, write_tape_file,
    ArchiveVolume, Attributes, CodePage, Config, ExtractOptions, LineEnding, RkResult, Volume,
};

const FILES_PER_ROW: usize = 5;

/// RK-DOS volume tool
#[derive(Parser, Debug)]
#[command(name = "rkdisk", version)]
#[command(about = "Add, extract, delete and list files on RK-DOS volumes")]
struct Args {
    /// JSON configuration file with default code page, line ending and address
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add file to volume
    #[command(alias = "a")]
    Add {
        volume: PathBuf,
        file: PathBuf,
        /// Starting address (hex)
        #[arg(short = 'a', long, value_parser = parse_address)]
        address: Option<u16>,
        /// Overwrite file if exists
        #[arg(short, long)]
        overwrite: bool,
        /// Set "Read only" attribute
        #[arg(short, long)]
        read_only: bool,
        /// Set "Hidden" attribute
        #[arg(short = 'H', long)]
        hidden: bool,
    },

    /// Extract file from volume
    #[command(alias = "x")]
    Extract {
        volume: PathBuf,
        name: String,
        /// Host file to write (defaults to the file name)
        target: Option<PathBuf>,
        /// Pack as a tape (.rk) file
        #[arg(short, long)]
        tape: bool,
        /// Convert text to KOI8-R, CP1251 or UTF-8
        #[arg(long = "cp", value_name = "CODEPAGE")]
        code_page: Option<CodePage>,
        /// Line ending for converted text (lf or crlf)
        #[arg(long)]
        line_ending: Option<LineEnding>,
    },

    /// Delete file from volume
    #[command(alias = "d")]
    Delete { volume: PathBuf, name: String },

    /// List files in volume
    #[command(alias = "l")]
    List {
        volume: PathBuf,
        /// Brief listing
        #[arg(short, long, conflicts_with = "bare")]
        brief: bool,
        /// File names only, one per line
        #[arg(long)]
        bare: bool,
    },

    /// Format or create new empty volume
    #[command(alias = "f")]
    Format {
        volume: PathBuf,
        /// Don't ask to confirm
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Set file attributes
    #[command(alias = "t")]
    Attrib {
        volume: PathBuf,
        name: String,
        /// Set "Read only" attribute
        #[arg(short, long)]
        read_only: bool,
        /// Set "Hidden" attribute
        #[arg(short = 'H', long)]
        hidden: bool,
    },

    /// Pack a host file as a tape (.rk) file
    Tape {
        input: PathBuf,
        output: PathBuf,
        /// Load address (hex)
        #[arg(short = 'a', long, value_parser = parse_address)]
        address: Option<u16>,
    },

    /// Convert a host file from native text
    Decode {
        input: PathBuf,
        output: PathBuf,
        /// Target code page (default UTF-8)
        #[arg(long = "cp", value_name = "CODEPAGE")]
        code_page: Option<CodePage>,
        /// Line ending (lf or crlf)
        #[arg(long)]
        line_ending: Option<LineEnding>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> RkResult<()> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    debug!("Using {:?}", config);

    match args.command {
        Command::Add {
            volume,
            file,
            address,
            overwrite,
            read_only,
            hidden,
        } => {
            let host_name = file.file_name().and_then(|n| n.to_str()).unwrap_or("");
            let new_name = to_rk_dos_name(host_name);
            if new_name != host_name {
                println!("New rk file name: {}", new_name);
            }
            print!("Adding file {} to volume {} ... ", host_name, volume.display());

            let mut vol = ArchiveVolume::open(&volume)?;
            let address = address.unwrap_or(config.load_address);
            let attributes = Attributes::new(read_only, hidden);
            add_from_path(&mut vol, &file, address, attributes, overwrite)?;
            vol.save()?;
        }
        Command::Extract {
            volume,
            name,
            target,
            tape,
            code_page,
            line_ending,
        } => {
            let target = target.unwrap_or_else(|| PathBuf::from(&name));
            print!(
                "Extracting file {} from volume {} to {} ... ",
                name,
                volume.display(),
                target.display()
            );

            let vol = ArchiveVolume::open(&volume)?;
            let opts = ExtractOptions {
                tape,
                code_page: code_page.or(config.code_page),
                line_ending: line_ending.unwrap_or(config.line_ending),
            };
            extract_to_path(&vol, &name, &target, &opts)?;
        }
        Command::Delete { volume, name } => {
            print!("Deleting file {} from volume {} ... ", name, volume.display());
            let mut vol = ArchiveVolume::open(&volume)?;
            vol.delete_file(&name)?;
            vol.save()?;
        }
        Command::List {
            volume,
            brief,
            bare,
        } => {
            let vol = ArchiveVolume::open(&volume)?;
            list_files(&vol, brief, bare);
            return Ok(());
        }
        Command::Format { volume, yes } => {
            if !yes && !confirm(&format!("Format volume {}?", volume.display()))? {
                return Ok(());
            }
            print!("Formatting volume {} ... ", volume.display());
            ArchiveVolume::create(&volume)?;
        }
        Command::Attrib {
            volume,
            name,
            read_only,
            hidden,
        } => {
            print!(
                "Setting file attributes {} in volume {} ... ",
                name,
                volume.display()
            );
            let mut vol = ArchiveVolume::open(&volume)?;
            vol.set_attributes(&name, Attributes::new(read_only, hidden))?;
            vol.save()?;
        }
        Command::Tape {
            input,
            output,
            address,
        } => {
            print!("Packing {} to {} ... ", input.display(), output.display());
            let data = std::fs::read(&input)?;
            write_tape_file(&output, &data, address.unwrap_or(config.load_address))?;
        }
        Command::Decode {
            input,
            output,
            code_page,
            line_ending,
        } => {
            let cp = code_page.or(config.code_page).unwrap_or(CodePage::Utf8);
            print!(
                "Converting {} to {} ({}) ... ",
                input.display(),
                output.display(),
                cp
            );
            decode_file(
                &input,
                &output,
                cp,
                line_ending.unwrap_or(config.line_ending),
            )?;
        }
    }

    println!("done.");
    Ok(())
}

fn decode_file(input: &Path, output: &Path, cp: CodePage, line_ending: LineEnding) -> RkResult<()> {
    let data = std::fs::read(input)?;
    rk_core::publish_atomically(output, &transcode(&data, cp, line_ending))
}

/// Print the directory in full, brief or bare form.
fn list_files<V: Volume>(vol: &V, brief: bool, bare: bool) {
    let files = vol.list_files();

    if bare {
        for fi in &files {
            println!("{}", fi.name);
        }
        return;
    }

    if brief {
        for (i, fi) in files.iter().enumerate() {
            print!("{:<14}\t", fi.name);
            if (i + 1) % FILES_PER_ROW == 0 {
                println!();
            }
        }
        println!();
    } else {
        println!("Name          \tAddr\t  Bytes\t  Attr");
        println!("----          \t----\t  -----\t  ----");
        for fi in &files {
            println!(
                "{:<14}\t{:04x}\t{:>7}\t{:>6}",
                fi.name,
                fi.load_address,
                fi.size,
                fi.attributes.to_string()
            );
        }
    }

    println!();
    println!("{} file(s) total", files.len());
}

/// Ask a yes/no question, reading a single key when attached to a terminal.
fn confirm(prompt: &str) -> std::io::Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;

    // Not a TTY: fall back to reading a line
    if enable_raw_mode().is_err() {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        return Ok(matches!(line.trim(), "y" | "Y"));
    }

    let answer = loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                break Ok(matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')));
            }
            Ok(_) => continue,
            Err(e) => break Err(e),
        }
    };

    let _ = disable_raw_mode();
    println!();
    answer
}
