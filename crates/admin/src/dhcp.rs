use crate::config::AdminConfig;
use crate::error::{require, AdminError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use winops_gather::aggregate;
use winops_protocol::{normalize_hardware_address, DhcpFilter, DhcpLease};
use winops_shell::{CommandRunner, Invoke};
use winops_tabular::extract::{FilterExtractor, LeaseExtractor, ScopeExtractor};
use winops_tabular::{parse_listing, ParserLimits};

/// IPv4 DHCP server: MAC filters through `netsh`, scopes and leases through
/// the PowerShell DHCP module.
pub struct DhcpService {
    netsh: Arc<dyn Invoke>,
    powershell: Arc<dyn Invoke>,
    limits: ParserLimits,
}

impl DhcpService {
    pub fn new(netsh: Arc<dyn Invoke>, powershell: Arc<dyn Invoke>, limits: ParserLimits) -> Self {
        Self {
            netsh,
            powershell,
            limits,
        }
    }

    pub fn from_config(config: &AdminConfig) -> Result<Self> {
        if !config.dhcp.enabled {
            return Err(AdminError::Disabled("dhcp"));
        }
        Ok(Self::new(
            Arc::new(config.runner(CommandRunner::netsh_dhcp())?),
            Arc::new(config.powershell()?),
            config.parser,
        ))
    }

    pub async fn filters(&self) -> Result<Vec<DhcpFilter>> {
        query_filters(self.netsh.as_ref(), &self.limits).await
    }

    pub async fn scopes(&self) -> Result<Vec<String>> {
        let text = self
            .powershell
            .run_str(&["Get-DhcpServerV4Scope", "|", "Select", "ScopeId"])
            .await?;
        Ok(parse_listing(&text, &ScopeExtractor::new(&self.limits))?)
    }

    /// Leases of every scope, in scope order, each carrying the comment of
    /// the filter with the same address.
    ///
    /// Only the scope enumeration can fail the call; a scope whose lease
    /// query fails is left out and a failed filter query leaves comments
    /// empty.
    pub async fn leases(&self) -> Result<Vec<DhcpLease>> {
        let scopes = self.scopes().await?;
        log::debug!("dhcp: querying leases of {} scopes", scopes.len());

        let limits = self.limits;
        let netsh = Arc::clone(&self.netsh);
        let comments = async move {
            let filters = query_filters(netsh.as_ref(), &limits).await?;
            Ok::<_, AdminError>(
                filters
                    .into_iter()
                    .map(|filter| (filter.address, filter.comment))
                    .collect::<HashMap<_, _>>(),
            )
        };

        let leases = aggregate(
            scopes,
            |scope: &String| {
                let powershell = Arc::clone(&self.powershell);
                let args = lease_query(scope);
                async move {
                    let text = powershell.run(&args).await?;
                    Ok::<_, AdminError>(parse_listing(&text, &LeaseExtractor::new(&limits))?)
                }
            },
            comments,
        )
        .await;
        Ok(leases)
    }

    pub async fn add_filter(&self, filter: &DhcpFilter) -> Result<()> {
        let address = checked_address(&filter.address)?;
        let mode = if filter.allow { "allow" } else { "deny" };
        let mut args = vec![
            "add".to_string(),
            "filter".to_string(),
            mode.to_string(),
            address,
        ];
        if !filter.comment.is_empty() {
            args.push(filter.comment.clone());
        }
        self.netsh.run(&args).await?;
        Ok(())
    }

    pub async fn delete_filter(&self, address: &str) -> Result<()> {
        let address = checked_address(address)?;
        self.netsh.run_str(&["delete", "filter", address.as_str()]).await?;
        Ok(())
    }

    /// Replaces the filter for `address` with `filter`.
    ///
    /// The console has no update verb. For the same address the old entry
    /// must go first; for a new address the new entry is added first so a
    /// failure leaves the old one in place.
    pub async fn modify_filter(&self, address: &str, filter: &DhcpFilter) -> Result<()> {
        let old = checked_address(address)?;
        let mut replacement = filter.clone();
        replacement.address = checked_address(&filter.address)?;

        if old == replacement.address {
            self.delete_filter(&old).await?;
            self.add_filter(&replacement).await
        } else {
            self.add_filter(&replacement).await?;
            self.delete_filter(&old).await
        }
    }
}

async fn query_filters(netsh: &dyn Invoke, limits: &ParserLimits) -> Result<Vec<DhcpFilter>> {
    let text = netsh.run_str(&["show", "filter"]).await?;
    Ok(parse_listing(&text, &FilterExtractor::new(limits))?)
}

fn lease_query(scope: &str) -> Vec<String> {
    [
        "Get-DhcpServerV4Lease",
        "-ScopeId",
        scope,
        "|",
        "Select",
        "ClientId,IPAddress",
    ]
    .iter()
    .map(|arg| (*arg).to_string())
    .collect()
}

fn checked_address(value: &str) -> Result<String> {
    require("address", value)?;
    normalize_hardware_address(value)
        .ok_or_else(|| AdminError::InvalidArgument(format!("invalid hardware address: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedInvoker;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    const FILTERS: &str = "\
Filters in the Allow list:
1\t90-94-97-8B-F5-F8\tOffice PC
Filters in the Deny list:
2\t9C-B6-D0-E8-38-47\tGuest phone
";

    const SCOPES: &str = "\r\nScopeId\r\n-------\r\n172.16.11.0\r\n172.16.12.0\r\n172.16.13.0\r\n\r\n";

    fn leases_of(rows: &[(&str, &str)]) -> String {
        let mut text = String::from("ClientId          IPAddress\n--------          ---------\n");
        for (mac, ip) in rows {
            text.push_str(&format!("{mac} {ip}\n"));
        }
        text
    }

    fn service(netsh: Arc<ScriptedInvoker>, powershell: Arc<ScriptedInvoker>) -> DhcpService {
        DhcpService::new(netsh, powershell, ParserLimits::default())
    }

    fn lease(ip: &str, mac: &str, comment: &str) -> DhcpLease {
        DhcpLease {
            ip_v4: ip.to_string(),
            address: mac.to_string(),
            comment: comment.to_string(),
        }
    }

    #[tokio::test]
    async fn filters_come_from_show_filter() {
        let netsh = Arc::new(ScriptedInvoker::new().reply("show filter", FILTERS));
        let dhcp = service(netsh.clone(), Arc::new(ScriptedInvoker::new()));
        let filters = dhcp.filters().await.unwrap();
        assert_eq!(filters.len(), 2);
        assert!(filters[0].allow);
        assert_eq!(filters[1].comment, "Guest phone");
        assert_eq!(netsh.calls(), vec!["show filter"]);
    }

    #[tokio::test]
    async fn leases_keep_scope_order_and_pick_up_filter_comments() {
        let netsh = Arc::new(ScriptedInvoker::new().reply("show filter", FILTERS));
        let powershell = Arc::new(
            ScriptedInvoker::new()
                .reply("Get-DhcpServerV4Scope", SCOPES)
                .reply_after(
                    "Get-DhcpServerV4Lease -ScopeId 172.16.11.0",
                    &leases_of(&[("90-94-97-8b-f5-f8", "172.16.11.19")]),
                    Duration::from_millis(40),
                )
                .reply_after(
                    "Get-DhcpServerV4Lease -ScopeId 172.16.12.0",
                    &leases_of(&[("00-1C-23-20-AF-4A", "172.16.12.7")]),
                    Duration::from_millis(20),
                )
                .reply(
                    "Get-DhcpServerV4Lease -ScopeId 172.16.13.0",
                    &leases_of(&[
                        ("9C-B6-D0-E8-38-47", "172.16.13.2"),
                        ("9C-B6-D0-E8-38-48", "172.16.13.3"),
                    ]),
                ),
        );
        let dhcp = service(netsh, powershell);
        let leases = dhcp.leases().await.unwrap();
        assert_eq!(
            leases,
            vec![
                lease("172.16.11.19", "90-94-97-8B-F5-F8", "Office PC"),
                lease("172.16.12.7", "00-1C-23-20-AF-4A", ""),
                lease("172.16.13.2", "9C-B6-D0-E8-38-47", "Guest phone"),
                lease("172.16.13.3", "9C-B6-D0-E8-38-48", ""),
            ]
        );
    }

    #[tokio::test]
    async fn failing_scope_is_left_out() {
        let netsh = Arc::new(ScriptedInvoker::new().fail("show filter", "The DHCP server is not running"));
        let powershell = Arc::new(
            ScriptedInvoker::new()
                .reply("Get-DhcpServerV4Scope", SCOPES)
                .reply(
                    "Get-DhcpServerV4Lease -ScopeId 172.16.11.0",
                    &leases_of(&[("90-94-97-8B-F5-F8", "172.16.11.19")]),
                )
                .fail("Get-DhcpServerV4Lease -ScopeId 172.16.12.0", "scope not found")
                .reply(
                    "Get-DhcpServerV4Lease -ScopeId 172.16.13.0",
                    &leases_of(&[("9C-B6-D0-E8-38-47", "172.16.13.2")]),
                ),
        );
        let leases = service(netsh, powershell).leases().await.unwrap();
        let ips: Vec<&str> = leases.iter().map(|l| l.ip_v4.as_str()).collect();
        assert_eq!(ips, vec!["172.16.11.19", "172.16.13.2"]);
        assert!(leases.iter().all(|l| l.comment.is_empty()));
    }

    #[tokio::test]
    async fn no_scopes_means_no_further_queries() {
        let netsh = Arc::new(ScriptedInvoker::new().reply("show filter", FILTERS));
        let powershell =
            Arc::new(ScriptedInvoker::new().reply("Get-DhcpServerV4Scope", "\r\nScopeId\r\n-------\r\n"));
        let leases = service(netsh.clone(), powershell.clone()).leases().await.unwrap();
        assert!(leases.is_empty());
        assert!(netsh.calls().is_empty());
        assert_eq!(powershell.calls().len(), 1);
    }

    #[tokio::test]
    async fn scope_enumeration_failure_is_returned() {
        let powershell =
            Arc::new(ScriptedInvoker::new().fail("Get-DhcpServerV4Scope", "Access is denied."));
        let err = service(Arc::new(ScriptedInvoker::new()), powershell)
            .leases()
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Access is denied.");
    }

    #[tokio::test]
    async fn add_filter_normalizes_the_address() {
        let netsh = Arc::new(ScriptedInvoker::new().reply("add filter", "Command completed successfully."));
        let dhcp = service(netsh.clone(), Arc::new(ScriptedInvoker::new()));
        dhcp.add_filter(&DhcpFilter {
            allow: true,
            address: "00:1c:23:20:af:4a".to_string(),
            comment: "lab printer".to_string(),
        })
        .await
        .unwrap();
        dhcp.add_filter(&DhcpFilter {
            allow: false,
            address: "00-1C-23-20-AF-4B".to_string(),
            comment: String::new(),
        })
        .await
        .unwrap();
        assert_eq!(
            netsh.calls(),
            vec![
                "add filter allow 00-1C-23-20-AF-4A lab printer",
                "add filter deny 00-1C-23-20-AF-4B",
            ]
        );
    }

    #[tokio::test]
    async fn malformed_address_never_reaches_the_console() {
        let netsh = Arc::new(ScriptedInvoker::new());
        let dhcp = service(netsh.clone(), Arc::new(ScriptedInvoker::new()));
        let err = dhcp.delete_filter("00-1C-23-20-AF").await.unwrap_err();
        assert!(matches!(err, AdminError::InvalidArgument(_)));
        let err = dhcp.delete_filter("  ").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: address is empty");
        assert!(netsh.calls().is_empty());
    }

    #[tokio::test]
    async fn modify_with_same_address_deletes_first() {
        let netsh = Arc::new(
            ScriptedInvoker::new()
                .reply("delete filter", "ok")
                .reply("add filter", "ok"),
        );
        let dhcp = service(netsh.clone(), Arc::new(ScriptedInvoker::new()));
        let filter = DhcpFilter {
            allow: false,
            address: "00-1c-23-20-af-4a".to_string(),
            comment: "moved".to_string(),
        };
        dhcp.modify_filter("00:1C:23:20:AF:4A", &filter).await.unwrap();
        assert_eq!(
            netsh.calls(),
            vec![
                "delete filter 00-1C-23-20-AF-4A",
                "add filter deny 00-1C-23-20-AF-4A moved",
            ]
        );
    }

    #[tokio::test]
    async fn modify_with_new_address_adds_first_and_stops_on_failure() {
        let netsh = Arc::new(ScriptedInvoker::new().fail("add filter", "The filter already exists."));
        let dhcp = service(netsh.clone(), Arc::new(ScriptedInvoker::new()));
        let filter = DhcpFilter {
            allow: true,
            address: "00-1C-23-20-AF-4B".to_string(),
            comment: String::new(),
        };
        let err = dhcp.modify_filter("00-1C-23-20-AF-4A", &filter).await.unwrap_err();
        assert_eq!(err.to_string(), "The filter already exists.");
        assert_eq!(netsh.calls(), vec!["add filter allow 00-1C-23-20-AF-4B"]);
    }

    #[test]
    fn disabled_dhcp_refuses_construction() {
        let mut config = AdminConfig::default();
        config.dhcp.enabled = false;
        assert!(matches!(
            DhcpService::from_config(&config),
            Err(AdminError::Disabled("dhcp"))
        ));
    }
}
