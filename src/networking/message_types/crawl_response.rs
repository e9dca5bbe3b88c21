use crate::networking::peer::PeerInfo;
use crate::{Error, Result};

/// - status(1 byte)
/// - peer_infos(bincode encoded, only present when status is Ok)

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlStatus {
    Ok = 0,
    Fail = 1,
}

impl CrawlStatus {
    fn from_byte(byte: u8) -> Result<CrawlStatus> {
        match byte {
            0 => Ok(CrawlStatus::Ok),
            1 => Ok(CrawlStatus::Fail),
            other => Err(Error::Decode(format!("unknown crawl status {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlResponse {
    status: CrawlStatus,
    peer_infos: Vec<PeerInfo>,
}

impl CrawlResponse {
    pub fn new(status: CrawlStatus, peer_infos: Vec<PeerInfo>) -> Self {
        CrawlResponse { status, peer_infos }
    }

    pub fn ok(peer_infos: Vec<PeerInfo>) -> Self {
        CrawlResponse::new(CrawlStatus::Ok, peer_infos)
    }

    pub fn failed() -> Self {
        CrawlResponse::new(CrawlStatus::Fail, vec![])
    }

    pub fn deserialize(bytes: &[u8]) -> Result<CrawlResponse> {
        let (status_byte, payload) = bytes
            .split_first()
            .ok_or_else(|| Error::Decode(String::from("empty crawl response")))?;

        match CrawlStatus::from_byte(*status_byte)? {
            CrawlStatus::Ok => {
                let peer_infos: Vec<PeerInfo> = bincode::deserialize(payload)
                    .map_err(|err| Error::Decode(format!("invalid peer list: {}", err)))?;
                Ok(CrawlResponse::ok(peer_infos))
            }
            CrawlStatus::Fail => Ok(CrawlResponse::failed()),
        }
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut vbytes: Vec<u8> = vec![self.status as u8];
        if self.status == CrawlStatus::Ok {
            vbytes.extend(
                bincode::serialize(&self.peer_infos)
                    .map_err(|err| Error::Encode(format!("peer list: {}", err)))?,
            );
        }
        Ok(vbytes)
    }

    pub fn get_status(&self) -> CrawlStatus {
        self.status
    }

    pub fn get_peer_infos(&self) -> &Vec<PeerInfo> {
        &self.peer_infos
    }

    pub fn into_peer_infos(self) -> Vec<PeerInfo> {
        self.peer_infos
    }
}
