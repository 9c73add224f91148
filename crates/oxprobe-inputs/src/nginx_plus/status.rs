//! The NGINX Plus `/status` document and its flattening into metrics.
//!
//! Every member defaults when absent so that older schema versions decode.
//! A `null` member counts as absent. Members introduced or removed in a given
//! version are `Option`s and only produce fields when present.

use oxprobe_common::accumulator::Accumulator;
use oxprobe_common::fields;
use oxprobe_common::types::{tags_with, Fields, Tags};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResponseStats {
    #[serde(rename = "1xx")]
    pub responses_1xx: i64,
    #[serde(rename = "2xx")]
    pub responses_2xx: i64,
    #[serde(rename = "3xx")]
    pub responses_3xx: i64,
    #[serde(rename = "4xx")]
    pub responses_4xx: i64,
    #[serde(rename = "5xx")]
    pub responses_5xx: i64,
    pub total: i64,
}

impl ResponseStats {
    fn add_to(&self, fields: &mut Fields) {
        fields.extend(fields! {
            "responses_1xx" => self.responses_1xx,
            "responses_2xx" => self.responses_2xx,
            "responses_3xx" => self.responses_3xx,
            "responses_4xx" => self.responses_4xx,
            "responses_5xx" => self.responses_5xx,
            "responses_total" => self.total,
        });
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BasicHitStats {
    pub responses: i64,
    pub bytes: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExtendedHitStats {
    pub responses: i64,
    pub bytes: i64,
    pub responses_written: i64,
    pub bytes_written: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HealthCheckStats {
    pub checks: i64,
    pub fails: i64,
    pub unhealthy: i64,
    pub last_passed: Option<bool>,
}

impl HealthCheckStats {
    fn add_to(&self, fields: &mut Fields) {
        fields.extend(fields! {
            "healthchecks_checks" => self.checks,
            "healthchecks_fails" => self.fails,
            "healthchecks_unhealthy" => self.unhealthy,
        });
        if let Some(last_passed) = self.last_passed {
            fields.extend(fields! { "healthchecks_last_passed" => last_passed });
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Processes {
    pub respawned: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Connections {
    pub accepted: i64,
    pub dropped: i64,
    pub active: i64,
    pub idle: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Ssl {
    pub handshakes: i64,
    pub handshakes_failed: i64,
    pub session_reuses: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Requests {
    pub total: i64,
    pub current: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServerZone {
    pub processing: i64,
    pub requests: i64,
    pub responses: ResponseStats,
    pub discarded: Option<i64>,
    pub received: i64,
    pub sent: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpstreamPeer {
    pub id: Option<i64>,
    pub server: String,
    pub backup: bool,
    pub weight: i64,
    pub state: String,
    pub active: i64,
    pub keepalive: Option<i64>,
    pub max_conns: Option<i64>,
    pub requests: i64,
    pub responses: ResponseStats,
    pub sent: i64,
    pub received: i64,
    pub fails: i64,
    pub unavail: i64,
    pub health_checks: HealthCheckStats,
    pub downtime: i64,
    pub downstart: i64,
    pub selected: Option<i64>,
    pub header_time: Option<i64>,
    pub response_time: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpstreamQueue {
    pub size: i64,
    pub max_size: i64,
    pub overflows: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Upstream {
    pub peers: Vec<UpstreamPeer>,
    pub keepalive: i64,
    pub zombies: i64,
    pub queue: Option<UpstreamQueue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Cache {
    pub size: i64,
    pub max_size: i64,
    pub cold: bool,
    pub hit: BasicHitStats,
    pub stale: BasicHitStats,
    pub updating: BasicHitStats,
    pub revalidated: Option<BasicHitStats>,
    pub miss: ExtendedHitStats,
    pub expired: ExtendedHitStats,
    pub bypass: ExtendedHitStats,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StreamServerZone {
    pub processing: i64,
    pub connections: i64,
    pub sessions: Option<ResponseStats>,
    pub discarded: Option<i64>,
    pub received: i64,
    pub sent: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StreamUpstreamPeer {
    pub id: i64,
    pub server: String,
    pub backup: bool,
    pub weight: i64,
    pub state: String,
    pub active: i64,
    pub connections: i64,
    pub connect_time: Option<i64>,
    pub first_byte_time: Option<i64>,
    pub response_time: Option<i64>,
    pub sent: i64,
    pub received: i64,
    pub fails: i64,
    pub unavail: i64,
    pub health_checks: HealthCheckStats,
    pub downtime: i64,
    pub downstart: i64,
    pub selected: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StreamUpstream {
    pub peers: Vec<StreamUpstreamPeer>,
    pub zombies: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Stream {
    pub server_zones: BTreeMap<String, StreamServerZone>,
    pub upstreams: BTreeMap<String, StreamUpstream>,
}

/// Top-level status document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Status {
    pub version: i64,
    pub nginx_version: String,
    pub address: String,
    /// Since version 5.
    pub generation: Option<i64>,
    /// Since version 2.
    pub load_timestamp: Option<i64>,
    pub timestamp: i64,
    /// Since version 6.
    pub pid: Option<i64>,
    /// Since version 5.
    pub processes: Option<Processes>,
    pub connections: Connections,
    /// Since version 6.
    pub ssl: Option<Ssl>,
    pub requests: Requests,
    pub server_zones: BTreeMap<String, ServerZone>,
    pub upstreams: BTreeMap<String, Upstream>,
    pub caches: BTreeMap<String, Cache>,
    pub stream: Stream,
}

/// Drops `null` object members and turns `null` array items into empty
/// objects, so both decode to their defaults.
fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                if item.is_null() {
                    *item = Value::Object(serde_json::Map::new());
                }
                strip_nulls(item);
            }
        }
        _ => {}
    }
}

impl Status {
    /// Decodes a status document.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        let mut value: Value = serde_json::from_slice(body)?;
        strip_nulls(&mut value);
        Self::deserialize(value)
    }

    /// Emits every section of the document, each record carrying a copy of
    /// `tags` plus its own section tags.
    pub fn gather(&self, tags: &Tags, acc: &dyn Accumulator) {
        self.gather_processes(tags, acc);
        self.gather_connections(tags, acc);
        self.gather_ssl(tags, acc);
        self.gather_requests(tags, acc);
        self.gather_zones(tags, acc);
        self.gather_upstreams(tags, acc);
        self.gather_caches(tags, acc);
        self.gather_stream(tags, acc);
    }

    fn gather_processes(&self, tags: &Tags, acc: &dyn Accumulator) {
        let respawned = self
            .processes
            .as_ref()
            .and_then(|p| p.respawned)
            .unwrap_or(0);
        acc.add_fields(
            "nginx_plus_processes",
            fields! { "respawned" => respawned },
            tags.clone(),
        );
    }

    fn gather_connections(&self, tags: &Tags, acc: &dyn Accumulator) {
        let c = &self.connections;
        acc.add_fields(
            "nginx_plus_connections",
            fields! {
                "accepted" => c.accepted,
                "dropped" => c.dropped,
                "active" => c.active,
                "idle" => c.idle,
            },
            tags.clone(),
        );
    }

    fn gather_ssl(&self, tags: &Tags, acc: &dyn Accumulator) {
        let Some(ssl) = &self.ssl else {
            return;
        };
        acc.add_fields(
            "nginx_plus_ssl",
            fields! {
                "handshakes" => ssl.handshakes,
                "handshakes_failed" => ssl.handshakes_failed,
                "session_reuses" => ssl.session_reuses,
            },
            tags.clone(),
        );
    }

    fn gather_requests(&self, tags: &Tags, acc: &dyn Accumulator) {
        acc.add_fields(
            "nginx_plus_requests",
            fields! {
                "total" => self.requests.total,
                "current" => self.requests.current,
            },
            tags.clone(),
        );
    }

    fn gather_zones(&self, tags: &Tags, acc: &dyn Accumulator) {
        for (name, zone) in &self.server_zones {
            let mut fields = fields! {
                "processing" => zone.processing,
                "requests" => zone.requests,
                "received" => zone.received,
                "sent" => zone.sent,
            };
            zone.responses.add_to(&mut fields);
            if let Some(discarded) = zone.discarded {
                fields.extend(fields! { "discarded" => discarded });
            }
            acc.add_fields("nginx_plus_zone", fields, tags_with(tags, "zone", name));
        }
    }

    fn gather_upstreams(&self, tags: &Tags, acc: &dyn Accumulator) {
        for (name, upstream) in &self.upstreams {
            let upstream_tags = tags_with(tags, "upstream", name);

            let mut fields = fields! {
                "keepalive" => upstream.keepalive,
                "zombies" => upstream.zombies,
            };
            if let Some(queue) = &upstream.queue {
                fields.extend(fields! {
                    "queue_size" => queue.size,
                    "queue_max_size" => queue.max_size,
                    "queue_overflows" => queue.overflows,
                });
            }
            acc.add_fields("nginx_plus_upstream", fields, upstream_tags.clone());

            for peer in &upstream.peers {
                let mut fields = fields! {
                    "backup" => peer.backup,
                    "weight" => peer.weight,
                    "state" => peer.state.as_str(),
                    "active" => peer.active,
                    "requests" => peer.requests,
                    "sent" => peer.sent,
                    "received" => peer.received,
                    "fails" => peer.fails,
                    "unavail" => peer.unavail,
                    "downtime" => peer.downtime,
                    "downstart" => peer.downstart,
                    "selected" => peer.selected.unwrap_or(0),
                };
                peer.responses.add_to(&mut fields);
                peer.health_checks.add_to(&mut fields);
                for (key, value) in [
                    ("header_time", peer.header_time),
                    ("response_time", peer.response_time),
                    ("max_conns", peer.max_conns),
                ] {
                    if let Some(v) = value {
                        fields.extend(fields! { key => v });
                    }
                }

                let mut peer_tags = tags_with(&upstream_tags, "upstream_address", &peer.server);
                if let Some(id) = peer.id {
                    peer_tags.insert("id".to_string(), id.to_string());
                }
                acc.add_fields("nginx_plus_upstream_peer", fields, peer_tags);
            }
        }
    }

    fn gather_caches(&self, tags: &Tags, acc: &dyn Accumulator) {
        for (name, cache) in &self.caches {
            let revalidated = cache.revalidated.as_ref();
            let mut fields = fields! {
                "size" => cache.size,
                "max_size" => cache.max_size,
                "cold" => cache.cold,
                "hit_responses" => cache.hit.responses,
                "hit_bytes" => cache.hit.bytes,
                "stale_responses" => cache.stale.responses,
                "stale_bytes" => cache.stale.bytes,
                "updating_responses" => cache.updating.responses,
                "updating_bytes" => cache.updating.bytes,
                "revalidated_responses" => revalidated.map_or(0, |r| r.responses),
                "revalidated_bytes" => revalidated.map_or(0, |r| r.bytes),
            };
            for (prefix, stats) in [
                ("miss", &cache.miss),
                ("expired", &cache.expired),
                ("bypass", &cache.bypass),
            ] {
                fields.extend(fields! {
                    format!("{prefix}_responses") => stats.responses,
                    format!("{prefix}_bytes") => stats.bytes,
                    format!("{prefix}_responses_written") => stats.responses_written,
                    format!("{prefix}_bytes_written") => stats.bytes_written,
                });
            }
            acc.add_fields("nginx_plus_cache", fields, tags_with(tags, "cache", name));
        }
    }

    fn gather_stream(&self, tags: &Tags, acc: &dyn Accumulator) {
        for (name, zone) in &self.stream.server_zones {
            let fields = fields! {
                "processing" => zone.processing,
                "connections" => zone.connections,
                "received" => zone.received,
                "sent" => zone.sent,
            };
            // Dotted name kept as-is; existing dashboards query it.
            acc.add_fields("nginx.stream.zone", fields, tags_with(tags, "zone", name));
        }

        for (name, upstream) in &self.stream.upstreams {
            let upstream_tags = tags_with(tags, "upstream", name);
            acc.add_fields(
                "nginx_plus_stream_upstream",
                fields! { "zombies" => upstream.zombies },
                upstream_tags.clone(),
            );

            for peer in &upstream.peers {
                let mut fields = fields! {
                    "backup" => peer.backup,
                    "weight" => peer.weight,
                    "state" => peer.state.as_str(),
                    "active" => peer.active,
                    "connections" => peer.connections,
                    "sent" => peer.sent,
                    "received" => peer.received,
                    "fails" => peer.fails,
                    "unavail" => peer.unavail,
                    "downtime" => peer.downtime,
                    "downstart" => peer.downstart,
                    "selected" => peer.selected,
                };
                peer.health_checks.add_to(&mut fields);
                for (key, value) in [
                    ("connect_time", peer.connect_time),
                    ("first_byte_time", peer.first_byte_time),
                    ("response_time", peer.response_time),
                ] {
                    if let Some(v) = value {
                        fields.extend(fields! { key => v });
                    }
                }

                let mut peer_tags = tags_with(&upstream_tags, "upstream_address", &peer.server);
                peer_tags.insert("id".to_string(), peer.id.to_string());
                acc.add_fields("nginx_plus_stream_upstream_peer", fields, peer_tags);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxprobe_common::accumulator::MemoryAccumulator;
    use oxprobe_common::types::FieldValue;

    fn base_tags() -> Tags {
        let mut tags = Tags::new();
        tags.insert("server".to_string(), "localhost".to_string());
        tags.insert("port".to_string(), "80".to_string());
        tags
    }

    fn gather(json: &str) -> MemoryAccumulator {
        let status = Status::from_slice(json.as_bytes()).expect("status should decode");
        let acc = MemoryAccumulator::new();
        status.gather(&base_tags(), &acc);
        acc
    }

    #[test]
    fn should_emit_zeroed_core_sections_for_empty_document() {
        let acc = gather("{}");

        let names: Vec<String> = acc.metrics().into_iter().map(|m| m.measurement).collect();
        assert_eq!(
            names,
            vec![
                "nginx_plus_processes",
                "nginx_plus_connections",
                "nginx_plus_requests",
            ]
        );
        let processes = &acc.measurement("nginx_plus_processes")[0];
        assert_eq!(processes.field("respawned"), Some(&FieldValue::Int(0)));
        assert_eq!(processes.tag("server"), Some("localhost"));
    }

    #[test]
    fn should_emit_ssl_only_when_section_is_present() {
        let acc = gather(r#"{"ssl": {"handshakes": 79572, "handshakes_failed": 21025, "session_reuses": 15762}}"#);

        let ssl = acc.measurement("nginx_plus_ssl");
        assert_eq!(ssl.len(), 1);
        assert_eq!(ssl[0].field("handshakes"), Some(&FieldValue::Int(79572)));
        assert_eq!(ssl[0].field("handshakes_failed"), Some(&FieldValue::Int(21025)));
        assert_eq!(ssl[0].field("session_reuses"), Some(&FieldValue::Int(15762)));
    }

    #[test]
    fn should_add_versioned_zone_fields_only_when_present() {
        let acc = gather(
            r#"{"server_zones": {
                "old": {"processing": 1, "requests": 2, "responses": {"2xx": 2, "total": 2}},
                "new": {"processing": 0, "requests": 5, "discarded": 3, "received": 10, "sent": 20}
            }}"#,
        );

        let zones = acc.measurement("nginx_plus_zone");
        assert_eq!(zones.len(), 2);
        let new = zones.iter().find(|z| z.tag("zone") == Some("new")).unwrap();
        let old = zones.iter().find(|z| z.tag("zone") == Some("old")).unwrap();
        assert_eq!(new.field("discarded"), Some(&FieldValue::Int(3)));
        assert_eq!(old.field("discarded"), None);
        assert_eq!(old.field("responses_2xx"), Some(&FieldValue::Int(2)));
        assert_eq!(old.field("responses_5xx"), Some(&FieldValue::Int(0)));
        assert_eq!(old.fields.len(), 10);
    }

    #[test]
    fn should_tag_upstream_peers_with_address_and_optional_id() {
        let acc = gather(
            r#"{"upstreams": {"backend": {
                "keepalive": 1,
                "peers": [
                    {"id": 0, "server": "10.0.0.1:8080", "state": "up", "selected": 1500, "max_conns": 100,
                     "health_checks": {"checks": 4, "last_passed": true}},
                    {"server": "10.0.0.2:8080", "state": "unavail", "keepalive": 2}
                ]
            }}}"#,
        );

        let upstream = acc.measurement("nginx_plus_upstream");
        assert_eq!(upstream.len(), 1);
        assert_eq!(upstream[0].fields.len(), 2);
        assert_eq!(upstream[0].tag("upstream"), Some("backend"));

        let peers = acc.measurement("nginx_plus_upstream_peer");
        assert_eq!(peers.len(), 2);
        assert_eq!(peers[0].tag("id"), Some("0"));
        assert_eq!(peers[0].tag("upstream_address"), Some("10.0.0.1:8080"));
        assert_eq!(peers[0].field("selected"), Some(&FieldValue::Int(1500)));
        assert_eq!(peers[0].field("max_conns"), Some(&FieldValue::Int(100)));
        assert_eq!(peers[0].field("healthchecks_checks"), Some(&FieldValue::Int(4)));
        assert_eq!(
            peers[0].field("healthchecks_last_passed"),
            Some(&FieldValue::Bool(true))
        );
        assert_eq!(peers[0].field("state"), Some(&FieldValue::from("up")));

        assert_eq!(peers[1].tag("id"), None);
        assert_eq!(peers[1].field("selected"), Some(&FieldValue::Int(0)));
        assert_eq!(peers[1].field("max_conns"), None);
        assert_eq!(peers[1].field("header_time"), None);
        assert_eq!(peers[1].field("healthchecks_last_passed"), None);
    }

    #[test]
    fn should_add_queue_fields_when_upstream_has_queue() {
        let acc = gather(
            r#"{"upstreams": {"q": {"zombies": 1, "queue": {"size": 3, "max_size": 10, "overflows": 7}}}}"#,
        );

        let upstream = &acc.measurement("nginx_plus_upstream")[0];
        assert_eq!(upstream.field("zombies"), Some(&FieldValue::Int(1)));
        assert_eq!(upstream.field("queue_size"), Some(&FieldValue::Int(3)));
        assert_eq!(upstream.field("queue_max_size"), Some(&FieldValue::Int(10)));
        assert_eq!(upstream.field("queue_overflows"), Some(&FieldValue::Int(7)));
    }

    #[test]
    fn should_zero_revalidated_counters_for_old_caches() {
        let acc = gather(
            r#"{"caches": {"static": {
                "size": 530, "max_size": 1024, "cold": false,
                "hit": {"responses": 254032, "bytes": 6685627875},
                "miss": {"responses": 1619201, "bytes": 53841943822, "responses_written": 44992, "bytes_written": 1}
            }}}"#,
        );

        let cache = &acc.measurement("nginx_plus_cache")[0];
        assert_eq!(cache.tag("cache"), Some("static"));
        assert_eq!(cache.fields.len(), 23);
        assert_eq!(cache.field("revalidated_responses"), Some(&FieldValue::Int(0)));
        assert_eq!(cache.field("hit_bytes"), Some(&FieldValue::Int(6685627875)));
        assert_eq!(cache.field("miss_bytes"), Some(&FieldValue::Int(53841943822)));
        assert_eq!(cache.field("miss_responses_written"), Some(&FieldValue::Int(44992)));
        assert_eq!(cache.field("bypass_bytes_written"), Some(&FieldValue::Int(0)));
        assert_eq!(cache.field("cold"), Some(&FieldValue::Bool(false)));
    }

    #[test]
    fn should_flatten_stream_section() {
        let acc = gather(
            r#"{"stream": {
                "server_zones": {"dns": {"processing": 1, "connections": 4, "discarded": 5, "received": 10, "sent": 20}},
                "upstreams": {"dns_backends": {"zombies": 0, "peers": [
                    {"id": 3, "server": "10.0.0.53:53", "state": "up", "connections": 4,
                     "connect_time": 12, "selected": 1700000000}
                ]}}
            }}"#,
        );

        let zone = &acc.measurement("nginx.stream.zone")[0];
        assert_eq!(zone.tag("zone"), Some("dns"));
        assert_eq!(zone.field("connections"), Some(&FieldValue::Int(4)));
        assert_eq!(zone.fields.len(), 4);
        assert_eq!(zone.field("discarded"), None);

        assert_eq!(acc.measurement("nginx_plus_stream_upstream").len(), 1);

        let peer = &acc.measurement("nginx_plus_stream_upstream_peer")[0];
        assert_eq!(peer.tag("id"), Some("3"));
        assert_eq!(peer.tag("upstream"), Some("dns_backends"));
        assert_eq!(peer.tag("upstream_address"), Some("10.0.0.53:53"));
        assert_eq!(peer.field("connect_time"), Some(&FieldValue::Int(12)));
        assert_eq!(peer.field("first_byte_time"), None);
        assert_eq!(peer.field("selected"), Some(&FieldValue::Int(1700000000)));
    }

    #[test]
    fn should_not_leak_section_tags_between_records() {
        let acc = gather(
            r#"{"server_zones": {"a": {}}, "upstreams": {"b": {"peers": [{"server": "x"}]}}}"#,
        );

        let processes = &acc.measurement("nginx_plus_processes")[0];
        assert_eq!(processes.tags.len(), 2);
        let zone = &acc.measurement("nginx_plus_zone")[0];
        assert_eq!(zone.tag("upstream"), None);
        let upstream = &acc.measurement("nginx_plus_upstream")[0];
        assert_eq!(upstream.tag("upstream_address"), None);
        assert_eq!(upstream.tag("zone"), None);
    }

    #[test]
    fn should_reject_fractional_counters() {
        let result = Status::from_slice(br#"{"connections": {"accepted": 1.5}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn should_treat_null_members_as_absent() {
        let acc = gather(
            r#"{"version": 6, "processes": null,
                "connections": {"accepted": null, "active": 3},
                "ssl": null,
                "server_zones": {"a": {"responses": null, "discarded": null}},
                "upstreams": {"b": {"peers": [null, {"server": "10.0.0.1:80", "health_checks": null}]}}}"#,
        );

        let connections = &acc.measurement("nginx_plus_connections")[0];
        assert_eq!(connections.field("accepted"), Some(&FieldValue::Int(0)));
        assert_eq!(connections.field("active"), Some(&FieldValue::Int(3)));
        assert_eq!(
            acc.measurement("nginx_plus_processes")[0].field("respawned"),
            Some(&FieldValue::Int(0))
        );
        assert!(acc.measurement("nginx_plus_ssl").is_empty());

        let zone = &acc.measurement("nginx_plus_zone")[0];
        assert_eq!(zone.field("responses_total"), Some(&FieldValue::Int(0)));
        assert_eq!(zone.field("discarded"), None);

        let peers = acc.measurement("nginx_plus_upstream_peer");
        assert_eq!(peers.len(), 2);
        assert_eq!(peers[1].tag("upstream_address"), Some("10.0.0.1:80"));
    }
}
