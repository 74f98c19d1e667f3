use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comcigan_timetable::comcigan::client::HttpFetcher;
use comcigan_timetable::config::Config;
use comcigan_timetable::timetable::weekday_name;
use comcigan_timetable::{log_format, search, ComciganError, SchoolEntry, TimeTable, TimetableRequest, Week};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file filename (with path)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the schools matching a name
    Search { name: String },

    /// Print a school's timetable
    Show {
        name: String,
        /// Pick among several matching schools by local code
        #[arg(long)]
        local_code: Option<i64>,
        /// Pick among several matching schools by school code
        #[arg(long)]
        school_code: Option<i64>,
        /// `this` or `next`
        #[arg(long, default_value = "this")]
        week: Week,
        #[arg(long)]
        grade: Option<usize>,
        #[arg(long = "class")]
        class_num: Option<usize>,
        /// 1 for Monday. All days if omitted.
        #[arg(long)]
        day: Option<usize>,
    },
}

fn print_schools(schools: &[SchoolEntry]) {
    for school in schools {
        println!("{}", school);
    }
}

fn print_class(timetable: &TimeTable, grade: usize, class_num: usize, day: Option<usize>) -> Result<()> {
    match timetable.homeroom(grade, class_num) {
        Ok(teacher) => println!("담임: {}", teacher),
        Err(e) => warn!("No homeroom teacher: {}", e),
    }

    let days = match day {
        Some(day) => vec![day],
        None => (1..=timetable.days(grade, class_num)).collect(),
    };
    for day in days {
        println!("[{}요일]", weekday_name(day));
        for cell in timetable.day(grade, class_num, day)? {
            if cell.is_empty() && !cell.is_substituted {
                continue;
            }
            match &cell.original {
                Some(original) => println!("  {} <- {}", cell, original),
                None => println!("  {}", cell),
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    log_format::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let fetcher = HttpFetcher::new(&config)?;

    match args.command {
        Command::Search { name } => {
            let schools = search(&fetcher, &config, &name).await?;
            info!("{} schools match {:?}", schools.len(), name);
            print_schools(&schools);
        }
        Command::Show {
            name,
            local_code,
            school_code,
            week,
            grade,
            class_num,
            day,
        } => {
            let request = TimetableRequest {
                school_name: name,
                local_code,
                school_code,
                week,
            };
            let timetable = match TimeTable::load(&fetcher, &config, &request).await {
                Ok(timetable) => timetable,
                Err(ComciganError::AmbiguousSchool { name, candidates }) => {
                    print_schools(&candidates);
                    return Err(ComciganError::AmbiguousSchool { name, candidates }.into());
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Loading timetable of {}", request.school_name))
                }
            };

            print!("{}", timetable);
            if let (Some(grade), Some(class_num)) = (grade, class_num) {
                print_class(&timetable, grade, class_num, day)?;
            }
        }
    }

    Ok(())
}
