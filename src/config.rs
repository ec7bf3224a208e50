use clap::{App, Arg, ArgMatches};
use encoding::label::encoding_from_whatwg_label;
use encoding::EncodingRef;
use encoding::all::UTF_8;
use std::path::PathBuf;
use std::time::Duration;

use crate::{Error, Field, Measure, Reduce, Scope};
use crate::error::Result;
use crate::report::DEFAULT_TEMPLATE;

/// Spreadsheet holding both the orders and the credentials tabs.
pub const SHEET_ID: &str = "1JbxRqsZTDgmdlJ_3nrumfjPvjGVZdjJe43FPrh9kYw4";
pub const ORDERS_GID: &str = "793147058";
pub const CREDENTIALS_GID: &str = "817322209";

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Everything the command line can change.
pub struct Config {
    pub name: String,
    pub key: String,
    pub sheet_id: String,
    pub orders_gid: String,
    pub credentials_gid: String,
    /// Read orders from this file instead of the spreadsheet.
    pub orders_path: Option<PathBuf>,
    /// Read credentials from this file instead of the spreadsheet.
    pub credentials_path: Option<PathBuf>,
    pub encoding: EncodingRef,
    pub scope: Scope,
    pub reduce: Reduce,
    pub template: String,
    /// Also write the scoped ranking here, as CSV.
    pub csv_path: Option<PathBuf>,
    pub watch: bool,
    pub refresh_interval: Duration,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            name: String::new(),
            key: String::new(),
            sheet_id: SHEET_ID.to_string(),
            orders_gid: ORDERS_GID.to_string(),
            credentials_gid: CREDENTIALS_GID.to_string(),
            orders_path: None,
            credentials_path: None,
            encoding: UTF_8,
            scope: Scope::Global,
            reduce: Reduce::new(),
            template: DEFAULT_TEMPLATE.to_string(),
            csv_path: None,
            watch: false,
            refresh_interval: REFRESH_INTERVAL,
        }
    }
}

pub fn app() -> App<'static, 'static> {
    App::new("salesboard")
        .version("0.1")
        .about("Ranks the best selling products of a partner's orders")
        .arg(
            Arg::with_name("name")
                .long("name")
                .value_name("NAME")
                .help("Partner name")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("key")
                .long("key")
                .value_name("KEY")
                .help("Partner api key")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("orders")
                .long("orders")
                .value_name("FILE")
                .help("Read orders from a local CSV file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("credentials")
                .long("credentials")
                .value_name("FILE")
                .help("Read credentials from a local CSV file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("sheet")
                .long("sheet")
                .value_name("ID")
                .help("Spreadsheet to download data from")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("orders-gid")
                .long("orders-gid")
                .value_name("GID")
                .help("Tab of the spreadsheet holding the orders")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("credentials-gid")
                .long("credentials-gid")
                .value_name("GID")
                .help("Tab of the spreadsheet holding the credentials")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("encoding")
                .long("encoding")
                .value_name("LABEL")
                .help("Character encoding of the documents")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("client")
                .long("client")
                .value_name("NAME")
                .help("Client to rank separately (admins only)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("group-by")
                .long("group-by")
                .value_name("FIELD")
                .help("Column to group orders by")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("measure")
                .long("measure")
                .value_name("FIELD")
                .help("Numeric column to sum")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("top")
                .long("top")
                .value_name("N")
                .help("How many entries to keep")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("template")
                .long("template")
                .value_name("TPL")
                .help("Template for each printed line")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("csv")
                .long("csv")
                .value_name("FILE")
                .help("Write the scoped ranking as CSV")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("watch")
                .long("watch")
                .help("Keep refreshing until interrupted"),
        )
        .arg(
            Arg::with_name("interval")
                .long("interval")
                .value_name("SECS")
                .help("Seconds between refreshes when watching")
                .takes_value(true),
        )
}

fn number(matches: &ArgMatches, name: &str) -> Result<Option<u64>> {
    match matches.value_of(name) {
        Some(v) => match v.parse::<u64>() {
            Ok(n) if n > 0 => Ok(Some(n)),
            _ => Err(Error::Config(format!("--{} must be a positive number, got {}", name, v))),
        },
        None => Ok(None),
    }
}

impl Config {
    pub fn from_matches(matches: &ArgMatches) -> Result<Config> {
        let mut config = Config::default();

        config.name = matches.value_of("name").unwrap_or_default().to_string();
        config.key = matches.value_of("key").unwrap_or_default().to_string();
        config.orders_path = matches.value_of("orders").map(PathBuf::from);
        config.credentials_path = matches.value_of("credentials").map(PathBuf::from);
        config.csv_path = matches.value_of("csv").map(PathBuf::from);
        config.watch = matches.is_present("watch");

        if let Some(sheet) = matches.value_of("sheet") {
            config.sheet_id = sheet.to_string();
        }
        if let Some(gid) = matches.value_of("orders-gid") {
            config.orders_gid = gid.to_string();
        }
        if let Some(gid) = matches.value_of("credentials-gid") {
            config.credentials_gid = gid.to_string();
        }
        if let Some(label) = matches.value_of("encoding") {
            config.encoding = encoding_from_whatwg_label(label)
                .ok_or_else(|| Error::UnknownEncoding(label.to_string()))?;
        }
        if let Some(client) = matches.value_of("client") {
            config.scope = client.parse().unwrap_or_default();
        }
        if let Some(field) = matches.value_of("group-by") {
            config.reduce = config.reduce.group_by(field.parse::<Field>()?);
        }
        if let Some(measure) = matches.value_of("measure") {
            config.reduce = config.reduce.measure(measure.parse::<Measure>()?);
        }
        if let Some(top) = number(matches, "top")? {
            config.reduce = config.reduce.limit(top as usize);
        }
        if let Some(template) = matches.value_of("template") {
            config.template = template.to_string();
        }
        if let Some(secs) = number(matches, "interval")? {
            config.refresh_interval = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
