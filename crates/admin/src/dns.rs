use crate::config::AdminConfig;
use crate::error::{require, AdminError, Result};
use std::sync::Arc;
use winops_protocol::DnsRecord;
use winops_shell::{CommandRunner, Invoke};
use winops_tabular::extract::{DnsRecordExtractor, RECORD_TYPE_A};
use winops_tabular::{parse_listing, ParserLimits};

/// A records of the zones hosted by the local DNS server, via `dnscmd`.
pub struct DnsService {
    dnscmd: Arc<dyn Invoke>,
    zones: Vec<String>,
    limits: ParserLimits,
}

impl DnsService {
    pub fn new(dnscmd: Arc<dyn Invoke>, zones: Vec<String>, limits: ParserLimits) -> Self {
        Self {
            dnscmd,
            zones,
            limits,
        }
    }

    pub fn from_config(config: &AdminConfig) -> Result<Self> {
        if !config.dns.enabled {
            return Err(AdminError::Disabled("dns"));
        }
        Ok(Self::new(
            Arc::new(config.runner(CommandRunner::dnscmd())?),
            config.dns.zones.clone(),
            config.parser,
        ))
    }

    /// Zones listed in the configuration.
    pub fn zones(&self) -> &[String] {
        &self.zones
    }

    pub async fn records(&self, zone: &str) -> Result<Vec<DnsRecord>> {
        require("zone", zone)?;
        let text = self
            .dnscmd
            .run_str(&["/EnumRecords", zone, ".", "/Type", RECORD_TYPE_A, "/Child"])
            .await?;
        Ok(parse_listing(&text, &DnsRecordExtractor::new(&self.limits))?)
    }

    pub async fn add_record(&self, zone: &str, name: &str, data: &str) -> Result<()> {
        check_record(zone, name, data)?;
        self.dnscmd
            .run_str(&["/RecordAdd", zone, name, RECORD_TYPE_A, data])
            .await?;
        Ok(())
    }

    pub async fn delete_record(&self, zone: &str, name: &str, data: &str) -> Result<()> {
        check_record(zone, name, data)?;
        self.dnscmd
            .run_str(&["/RecordDelete", zone, name, RECORD_TYPE_A, data, "/f"])
            .await?;
        Ok(())
    }
}

fn check_record(zone: &str, name: &str, data: &str) -> Result<()> {
    require("zone", zone)?;
    require("name", name)?;
    require("data", data)
}
