use schemars::schema_for;
use serde_json::{Map, Value};
use winops_protocol::{
    DhcpFilter, DhcpLease, DirectoryUser, DnsRecord, Permission, RepositoryItem, UserPermission,
};

/// JSON Schemas of every record the commands print, keyed by type name.
pub(crate) fn record_schemas() -> serde_json::Result<Value> {
    let schemas = [
        ("DhcpFilter", schema_for!(DhcpFilter)),
        ("DhcpLease", schema_for!(DhcpLease)),
        ("DnsRecord", schema_for!(DnsRecord)),
        ("RepositoryItem", schema_for!(RepositoryItem)),
        ("Permission", schema_for!(Permission)),
        ("UserPermission", schema_for!(UserPermission)),
        ("DirectoryUser", schema_for!(DirectoryUser)),
    ];
    let mut out = Map::new();
    for (name, schema) in schemas {
        out.insert(name.to_string(), serde_json::to_value(schema)?);
    }
    Ok(Value::Object(out))
}
