//! Minimal scripted UDP nameserver for resolver tests.
//!
//! Answers A queries from a fixed name → addresses map using hickory-proto
//! for the wire format. Unknown names get an empty answer section. A
//! `silent` server never responds, so queries to it can only time out.

use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::thread;

pub struct StubNameserver {
    pub addr: SocketAddr,
}

/// Starts a nameserver answering from `zone` (keys are lowercase names
/// without the trailing dot). Runs until the process exits.
pub fn start(zone: HashMap<String, Vec<Ipv4Addr>>) -> StubNameserver {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("bind udp");
    let addr = socket.local_addr().unwrap();
    thread::spawn(move || loop {
        let mut buf = [0u8; 1500];
        let Ok((n, peer)) = socket.recv_from(&mut buf) else {
            return;
        };
        let Ok(query) = Message::from_vec(&buf[..n]) else {
            continue;
        };
        let Some(question) = query.queries().first().cloned() else {
            continue;
        };

        let mut response = Message::new();
        response.set_id(query.id());
        response.set_message_type(MessageType::Response);
        response.set_recursion_desired(true);
        response.set_recursion_available(true);
        response.set_response_code(ResponseCode::NoError);
        response.add_query(question.clone());

        let name = question
            .name()
            .to_utf8()
            .trim_end_matches('.')
            .to_ascii_lowercase();
        if let Some(addresses) = zone.get(&name) {
            for ip in addresses {
                response.add_answer(Record::from_rdata(
                    question.name().clone(),
                    60,
                    RData::A(A(*ip)),
                ));
            }
        }

        let Ok(bytes) = response.to_vec() else {
            continue;
        };
        let _ = socket.send_to(&bytes, peer);
    });
    StubNameserver { addr }
}

/// A nameserver that swallows every query without answering.
pub fn start_silent() -> StubNameserver {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("bind udp");
    let addr = socket.local_addr().unwrap();
    thread::spawn(move || loop {
        let mut buf = [0u8; 1500];
        if socket.recv_from(&mut buf).is_err() {
            return;
        }
    });
    StubNameserver { addr }
}
