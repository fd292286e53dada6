use clap::{crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};
use forkzero_site::build::{build_site, load_posts};
use forkzero_site::config::Config;
use forkzero_site::page::Page;
use forkzero_site::parser::Parser;
use forkzero_site::route::resolve_route;
use forkzero_site::write::Fragments;
use log::error;
use std::error::Error;
use std::path::{Path, PathBuf};

type Result<T> = std::result::Result<T, Box<dyn Error>>;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("forkzero-site")
        .version(crate_version!())
        .about("Pre-renders the Forkzero blog for crawlers and feed readers")
        .setting(AppSettings::VersionlessSubcommands)
        .arg(
            Arg::with_name("project")
                .long("project")
                .value_name("DIR")
                .default_value(".")
                .help("Where to start searching for forkzero.yaml"),
        )
        .arg(
            Arg::with_name("dist")
                .long("dist")
                .value_name("DIR")
                .help("Overrides the dist directory"),
        )
        .subcommand(
            SubCommand::with_name("prerender")
                .about("Writes a page per blog route and the feed (the default)"),
        )
        .subcommand(SubCommand::with_name("check").about("Loads and validates the posts"))
        .subcommand(
            SubCommand::with_name("route")
                .about("Prints the page a path resolves to")
                .arg(Arg::with_name("PATH").required(true)),
        )
        .subcommand(
            SubCommand::with_name("render")
                .about("Prints the noscript fallback for a post file")
                .arg(Arg::with_name("FILE").required(true)),
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let mut config = Config::from_directory(Path::new(
        matches.value_of("project").unwrap_or("."),
    ))?;
    if let Some(dist) = matches.value_of("dist") {
        config = config.with_dist_directory(PathBuf::from(dist));
    }

    match matches.subcommand() {
        ("check", _) => check(&config),
        ("route", Some(sub)) => route(&config, sub.value_of("PATH").unwrap_or("/")),
        ("render", Some(sub)) => render(&config, Path::new(sub.value_of("FILE").unwrap_or(""))),
        _ => {
            let written = build_site(&config)?;
            println!("Wrote {} file(s) to {}", written.len(), config.dist_directory.display());
            Ok(())
        }
    }
}

fn check(config: &Config) -> Result<()> {
    let posts = load_posts(config)?;
    for post in &posts {
        println!("{}  {}  {}", post.date, post.slug, post.title);
    }
    println!("{} post(s) OK", posts.len());
    Ok(())
}

fn route(config: &Config, path: &str) -> Result<()> {
    let posts = load_posts(config)?;
    let route = resolve_route(path);
    let meta = Page::select(&route, &posts).meta(&config.site)?;
    println!("{}\n{}\n{}", route, meta.title, meta.canonical);
    Ok(())
}

fn render(config: &Config, file: &Path) -> Result<()> {
    let parser = Parser::new(&config.posts_directory);
    let post = parser.parse_post(file)?;
    println!(
        "{}",
        Fragments::new()?.noscript(&config.site, &Page::BlogPost(&post))?
    );
    Ok(())
}
