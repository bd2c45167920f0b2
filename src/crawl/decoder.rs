// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Transport decoding of response bodies
//!
//! `gzip` and `br` are decompressed here. `deflate` is inflated by the HTTP
//! client, so a body still tagged `deflate` is passed through untouched and
//! never decompressed a second time. Unknown or absent encodings pass through.

use flate2::read::GzDecoder;
use std::io::Read;

use super::types::CrawlError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const BROTLI_BUFFER_SIZE: usize = 4096;

/// Declared `Content-Encoding` of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Gzip,
    Brotli,
    Deflate,
    Identity,
}

impl ContentEncoding {
    /// Parse a `Content-Encoding` header value; anything unrecognized is identity
    pub fn from_header(tag: Option<&str>) -> Self {
        match tag.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            Some("gzip") | Some("x-gzip") => Self::Gzip,
            Some("br") => Self::Brotli,
            Some("deflate") => Self::Deflate,
            _ => Self::Identity,
        }
    }
}

/// Wrap `body` in the decompressor for `encoding`
///
/// gzip framing is checked eagerly. Brotli errors only surface when the
/// returned reader is read past the corrupt point. The decompressor owns
/// `body` and is released when the returned reader is dropped.
pub fn decoding_reader<'a, R>(
    mut body: R,
    encoding: ContentEncoding,
) -> Result<Box<dyn Read + 'a>, CrawlError>
where
    R: Read + 'a,
{
    match encoding {
        ContentEncoding::Gzip => {
            let mut magic = [0u8; 2];
            body.read_exact(&mut magic)
                .map_err(|e| CrawlError::Decode(format!("invalid gzip stream: {}", e)))?;
            if magic != GZIP_MAGIC {
                return Err(CrawlError::Decode(
                    "invalid gzip stream: bad header".to_string(),
                ));
            }
            let rejoined = std::io::Cursor::new(magic).chain(body);
            Ok(Box::new(GzDecoder::new(rejoined)))
        }
        ContentEncoding::Brotli => Ok(Box::new(brotli::Decompressor::new(
            body,
            BROTLI_BUFFER_SIZE,
        ))),
        ContentEncoding::Deflate | ContentEncoding::Identity => Ok(Box::new(body)),
    }
}

/// Decode a complete response body according to its declared encoding tag
pub fn decode(body: &[u8], encoding_tag: Option<&str>) -> Result<Vec<u8>, CrawlError> {
    let encoding = ContentEncoding::from_header(encoding_tag);
    if matches!(encoding, ContentEncoding::Deflate | ContentEncoding::Identity) {
        return Ok(body.to_vec());
    }

    let mut reader = decoding_reader(body, encoding)?;
    let mut decoded = Vec::new();
    reader
        .read_to_end(&mut decoded)
        .map_err(|e| CrawlError::Decode(format!("{:?} stream: {}", encoding, e)))?;
    Ok(decoded)
}
