//! One handler per subcommand.
//!
//! [`App`] is built once per process from the conf file. Handlers print to
//! stdout and return errors to `main`, which decides the exit status.

use std::future::Future;
use std::io;
use std::path::PathBuf;

use mull_shared::{is_relay_identifier, RelayError, RelayRef};
use mull_store::{ConfFile, Database, Favorites, QueryFilter, Resolver, ResultCache};
use tracing::{info, warn};

use crate::cli::{Commands, Target};
use crate::config::CliConfig;
use crate::error::{CliError, Result};
use crate::lifecycle::{Controller, SessionProbe, Teardown};
use crate::output::{green, index_list, relay_details, relay_header, relay_row, yellow};
use crate::system::{PsInspector, StdinConfirm, WgProbe, WgQuick};

pub struct App {
    config: CliConfig,
    database_path: PathBuf,
    torrent_clients: Vec<String>,
    favorites: Favorites,
    results: ResultCache,
}

impl App {
    /// Read the conf file, filling in and saving a missing `[database]`
    /// section.
    pub fn load(config: CliConfig) -> Result<Self> {
        let mut conf = ConfFile::load(&config.conf_path)?;
        if conf.ensure_database_section() {
            conf.save(&config.conf_path)?;
            info!(path = %config.conf_path.display(), "wrote default [database] section");
        }

        let database_path = config.database_path(
            &conf
                .database
                .as_ref()
                .map(|d| d.relay_database_path.clone())
                .unwrap_or_default(),
        );
        let torrent_clients = conf.torrent_clients();
        let favorites = Favorites::from_conf(&config.conf_path, conf);
        let results = ResultCache::new(&config.results_path);

        Ok(Self {
            config,
            database_path,
            torrent_clients,
            favorites,
            results,
        })
    }

    pub fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Up { target, verbose } => self.up(&target, verbose),
            Commands::Down { target, verbose } => self.down(&target, verbose),
            Commands::Add { target, position } => {
                let (target, position) = Commands::add_parts(&target, position);
                self.add(&target, position)
            }
            Commands::Remove { relay } => self.remove(&relay),
            Commands::Swap { index1, index2 } => self.swap(index1, index2),
            Commands::Move { from, to } => self.move_entry(from, to),
            Commands::Defaults => self.defaults(),
            Commands::Update => self.update(),
            Commands::Info { target, verbose } => self.info(&target, verbose),
            Commands::Results => self.results(),
            Commands::Status { target, verbose } => self.status(&target, verbose),
            Commands::Active { status } => self.active(status),
            Commands::Query(args) => self.query(&args.into()),
        }
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.favorites, &self.results)
    }

    fn database(&self) -> Result<Database> {
        Ok(Database::open_at(&self.database_path)?)
    }

    fn up(&self, target: &Target, verbose: bool) -> Result<()> {
        let tool = WgQuick::new(self.config.use_sudo);
        let probe = WgProbe::new(self.config.use_sudo);
        let inspector = PsInspector::new(self.torrent_clients.clone());
        let mut out = io::stdout().lock();

        Controller::new(&tool, &probe, &inspector, &StdinConfirm)
            .verbose(verbose)
            .activate(&self.resolver(), &target.relay_ref(), &mut out)?;
        Ok(())
    }

    fn down(&self, target: &Target, verbose: bool) -> Result<()> {
        let tool = WgQuick::new(self.config.use_sudo);
        let probe = WgProbe::new(self.config.use_sudo);
        let inspector = PsInspector::new(self.torrent_clients.clone());
        let mut out = io::stdout();

        match Controller::new(&tool, &probe, &inspector, &StdinConfirm)
            .verbose(verbose)
            .deactivate(&self.resolver(), &target.relay_ref(), &mut out)?
        {
            Teardown::Done(relays) => info!(count = relays.len(), "deactivated"),
            Teardown::Aborted => info!("deactivation declined"),
        }
        Ok(())
    }

    fn add(&mut self, target: &RelayRef, position: Option<i64>) -> Result<()> {
        let relay = self
            .resolver()
            .resolve(target)?
            .ok_or(CliError::NoRelaySpecified)?;
        let added = self.favorites.add(&relay, position)?;
        println!("{}", green(&format!("`{added}` added successfully")));
        Ok(())
    }

    fn remove(&mut self, token: &str) -> Result<()> {
        let removed = self.favorites.remove(token)?;
        println!("{}", green(&format!("`{removed}` removed successfully")));
        Ok(())
    }

    fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        self.favorites.swap(i, j)?;
        println!("{}", green(&format!("Swapped positions {i} and {j}")));
        Ok(())
    }

    fn move_entry(&mut self, from: usize, to: usize) -> Result<()> {
        let moved = self.favorites.move_entry(from, to)?;
        println!("{}", green(&format!("Moved `{moved}` from {from} to {to}")));
        Ok(())
    }

    fn defaults(&self) -> Result<()> {
        if self.favorites.is_empty() {
            println!("No default relays found, add relay using `mull add <relay>`");
            return Ok(());
        }
        for (i, relay) in self.favorites.list() {
            println!("{i} : {}", yellow(relay));
        }
        Ok(())
    }

    fn update(&self) -> Result<()> {
        let relays = block_on(mull_net::fetch_relays(&self.config.relays_url))??;
        let count = self.database()?.replace_relays(&relays)?;
        println!("{}", green(&format!("Database updated successfully ({count} relays)")));
        Ok(())
    }

    fn info(&self, target: &Target, verbose: bool) -> Result<()> {
        let hostname = self
            .resolver()
            .resolve(&target.relay_ref())?
            .ok_or(CliError::NoRelaySpecified)?;
        let relay = self.database()?.get_relay(&hostname)?;

        println!("{}", relay_header(false));
        println!("{}", relay_row(None, &relay));
        if verbose {
            println!();
            for line in relay_details(&relay) {
                println!("{line}");
            }
        }
        Ok(())
    }

    fn results(&self) -> Result<()> {
        let hostnames = self.results.load()?;
        for line in index_list(hostnames.iter().map(String::as_str).enumerate()) {
            println!("{line}");
        }
        Ok(())
    }

    fn query(&self, filter: &QueryFilter) -> Result<()> {
        let relays = self.database()?.query_relays(filter)?;
        if relays.is_empty() {
            println!("No results found matching specified query");
            return Ok(());
        }

        println!("{}", relay_header(true));
        for (i, relay) in relays.iter().enumerate() {
            println!("{}", relay_row(Some(i), relay));
        }

        let hostnames: Vec<String> = relays.into_iter().map(|r| r.hostname).collect();
        self.results.save(&hostnames)?;
        Ok(())
    }

    fn status(&self, target: &Target, verbose: bool) -> Result<()> {
        let probe = WgProbe::new(self.config.use_sudo);

        if let Some(relay) = self.resolver().resolve(&target.relay_ref())? {
            let status = probe.status(&relay)?;
            print!("{}", status.text);
            let availability = if status.available { "yes" } else { "no" };
            println!("{} {availability}", yellow("available:"));
            return Ok(());
        }

        let check = block_on(mull_net::connection_check(&self.config.check_url))??;
        if !check.is_connected() {
            println!("No active relay found");
            return Ok(());
        }
        for (key, value) in check.rows() {
            println!("{} {value}", yellow(&format!("{key:<18}")));
        }

        if verbose {
            let hostname = check.mullvad_exit_ip_hostname.unwrap_or_default();
            if !is_relay_identifier(&hostname) {
                return Err(RelayError::InvalidFormat(hostname).into());
            }
            let rule = "-".repeat(40);
            println!("{rule}");
            print!("{}", probe.status(&hostname)?.text);
            println!("{rule}");
        }
        Ok(())
    }

    fn active(&self, with_status: bool) -> Result<()> {
        let probe = WgProbe::new(self.config.use_sudo);
        let sessions = probe.active_sessions()?;
        if sessions.is_empty() {
            println!("No active relays");
            return Ok(());
        }

        for session in &sessions {
            println!("{}", yellow(session));
            if with_status {
                print!("{}", probe.status(session)?.text);
                println!();
            }
        }
        Ok(())
    }
}

/// Run one network future to completion on a throwaway runtime.
fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| {
            warn!(error = %e, "failed to start async runtime");
            CliError::Io(e)
        })?;
    Ok(runtime.block_on(future))
}
