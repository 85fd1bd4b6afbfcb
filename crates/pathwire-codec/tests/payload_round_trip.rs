use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use pathwire_codec::info::{
    AsInfoReply, AsInfoReplyEntry, AsInfoReq, IfInfoReply, IfInfoReplyEntry, IfInfoRequest,
    ServiceInfoReply, ServiceInfoReplyEntry, ServiceInfoRequest, ServiceType,
};
use pathwire_codec::path::{
    FwdPathMeta, PathErrorCode, PathInterface, PathReply, PathReplyEntry, PathReq, PathReqFlags,
};
use pathwire_codec::revocation::{LinkType, RevInfo, RevNotification, RevReply, RevResult};
use pathwire_codec::{decode_payload, encode_payload, HostInfo, Payload, PayloadBody, Which};
use pathwire_core::IsdAsn;

fn ia(raw: &str) -> IsdAsn {
    raw.parse().expect("valid ia")
}

fn v4_host(last: u8, port: u16) -> HostInfo {
    HostInfo::new(IpAddr::V4(Ipv4Addr::new(192, 0, 2, last)), port)
}

fn two_hop(src: &str, dst: &str, src_if: u64, dst_if: u64) -> FwdPathMeta {
    FwdPathMeta {
        fwd_path: vec![0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77],
        mtu: 1400,
        interfaces: vec![
            PathInterface::new(ia(src), src_if),
            PathInterface::new(ia(dst), dst_if),
        ],
    }
}

fn round_trip(payload: &Payload) -> Payload {
    let bytes = encode_payload(payload).expect("payload should encode");
    decode_payload(&bytes).expect("payload should decode")
}

fn sample_payloads() -> Vec<Payload> {
    vec![
        Payload::new(
            1,
            PathReq {
                dst: ia("2-ff00:0:220"),
                src: ia("1-ff00:0:110"),
                max_paths: 10,
                flags: PathReqFlags {
                    flush: false,
                    sibra: true,
                },
            },
        ),
        Payload::new(
            2,
            PathReply {
                error_code: PathErrorCode::OK,
                entries: vec![PathReplyEntry {
                    path: two_hop("1-ff00:0:110", "2-ff00:0:220", 3, 8),
                    host_info: v4_host(1, 31_000),
                }],
            },
        ),
        Payload::new(3, AsInfoReq { isd_as: IsdAsn::WILDCARD }),
        Payload::new(
            4,
            AsInfoReply {
                entries: vec![AsInfoReplyEntry {
                    isd_as: ia("1-ff00:0:110"),
                    mtu: 1472,
                    is_core: true,
                }],
            },
        ),
        Payload::new(
            5,
            RevNotification {
                rev_info: RevInfo {
                    if_id: 12,
                    isd_as: ia("1-ff00:0:110"),
                    link_type: LinkType::CHILD,
                    timestamp: 1_700_000_000,
                    ttl: 10,
                },
            },
        ),
        Payload::new(6, RevReply { result: RevResult::INVALID }),
        Payload::new(7, IfInfoRequest { if_ids: vec![1, 2, 3] }),
        Payload::new(
            8,
            IfInfoReply {
                entries: vec![IfInfoReplyEntry {
                    if_id: 1,
                    host_info: HostInfo::new(IpAddr::V6(Ipv6Addr::LOCALHOST), 50_000),
                }],
            },
        ),
        Payload::new(
            9,
            ServiceInfoRequest {
                service_types: vec![ServiceType::BS, ServiceType::PS, ServiceType::CS],
            },
        ),
        Payload::new(
            10,
            ServiceInfoReply {
                entries: vec![ServiceInfoReplyEntry {
                    service_type: ServiceType::PS,
                    ttl: 300,
                    host_infos: vec![v4_host(7, 30_252), v4_host(8, 30_252)],
                }],
            },
        ),
    ]
}

#[test]
fn every_payload_kind_round_trips() {
    let payloads = sample_payloads();
    let kinds: Vec<Which> = payloads.iter().map(Payload::which).collect();
    assert_eq!(kinds, Which::ALL.to_vec());

    for payload in payloads {
        assert_eq!(round_trip(&payload), payload, "{}", payload.which());
    }
}

#[test]
fn path_reply_with_two_entries_keeps_hop_order() {
    let payload = Payload::new(
        0xfeed,
        PathReply {
            error_code: PathErrorCode::OK,
            entries: vec![
                PathReplyEntry {
                    path: two_hop("1-ff00:0:110", "1-ff00:0:111", 1, 41),
                    host_info: v4_host(10, 31_000),
                },
                PathReplyEntry {
                    path: two_hop("1-ff00:0:110", "1-ff00:0:112", 2, 42),
                    host_info: v4_host(11, 31_000),
                },
            ],
        },
    );

    let decoded = round_trip(&payload);
    assert_eq!(decoded.id, 0xfeed);
    let reply = match decoded.body {
        PayloadBody::PathReply(reply) => reply,
        other => panic!("expected a path reply, got {other:?}"),
    };
    assert_eq!(reply.error_code, PathErrorCode::OK);
    assert_eq!(reply.entries.len(), 2);

    for entry in &reply.entries {
        let path = &entry.path;
        assert_eq!(path.mtu, 1400);
        assert_eq!(path.src_ia(), path.interfaces.first().map(|i| i.isd_as));
        assert_eq!(path.dst_ia(), path.interfaces.last().map(|i| i.isd_as));
        assert_eq!(entry.host_info.port(), 31_000);
        assert!(entry.host_info.ipv4().is_some());
    }
    assert_eq!(reply.entries[0].path.dst_ia(), Some(ia("1-ff00:0:111")));
    assert_eq!(reply.entries[1].path.dst_ia(), Some(ia("1-ff00:0:112")));
}

#[test]
fn interface_map_after_decode_keeps_last_duplicate() {
    let first = v4_host(1, 40_001);
    let second = v4_host(2, 40_002);
    let payload = Payload::new(
        77,
        IfInfoReply {
            entries: vec![
                IfInfoReplyEntry {
                    if_id: 7,
                    host_info: first,
                },
                IfInfoReplyEntry {
                    if_id: 7,
                    host_info: second,
                },
            ],
        },
    );

    let reply = match round_trip(&payload).body {
        PayloadBody::IfInfoReply(reply) => reply,
        other => panic!("expected an interface reply, got {other:?}"),
    };
    assert_eq!(reply.entries.len(), 2);
    assert_eq!(reply.interface_map()[&7], second);
}

#[test]
fn out_of_range_enum_values_decode_with_fallback_rendering() {
    let payloads = [
        Payload::new(
            1,
            PathReply {
                error_code: PathErrorCode(900),
                entries: Vec::new(),
            },
        ),
        Payload::new(2, RevReply { result: RevResult(77) }),
        Payload::new(
            3,
            ServiceInfoRequest {
                service_types: vec![ServiceType(31)],
            },
        ),
    ];

    let rendered: Vec<String> = payloads
        .iter()
        .map(|payload| match round_trip(payload).body {
            PayloadBody::PathReply(reply) => reply.error_code.to_string(),
            PayloadBody::RevReply(reply) => reply.result.to_string(),
            PayloadBody::ServiceInfoRequest(req) => req.service_types[0].to_string(),
            other => panic!("unexpected body {other:?}"),
        })
        .collect();

    assert_eq!(
        rendered,
        vec![
            "Unknown error (900)".to_string(),
            "Unknown revocation result (77)".to_string(),
            "??".to_string(),
        ]
    );
}
