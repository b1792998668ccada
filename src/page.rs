use std::io::{self, Read, Write};

use tracing::debug;

use crate::error::*;

pub const PAGE_SIZE: usize = 0x8000;
pub const HALF_SIZE: usize = PAGE_SIZE / 2;

/// ページの前半と後半を入れ替える。2 回適用すると元に戻る。
pub fn unshuffle_page(page: &mut [u8; PAGE_SIZE]) {
    let (lo, hi) = page.split_at_mut(HALF_SIZE);
    lo.swap_with_slice(hi);
}

/// メモリ上のバッファを全ページ unshuffle する。
pub fn unshuffle(buf: impl AsRef<[u8]>) -> Result<Vec<u8>> {
    let buf = buf.as_ref();

    let mut res = Vec::with_capacity(buf.len());
    unshuffle_pages(buf, &mut res, buf.len() / PAGE_SIZE)?;

    let rest = buf.len() % PAGE_SIZE;
    if rest != 0 {
        return Err(Error::TruncatedInput {
            page: buf.len() / PAGE_SIZE,
            count: buf.len() / PAGE_SIZE + 1,
            len: rest,
        });
    }

    Ok(res)
}

/// `rdr` の現在位置から `count` ページ読み、前後半を入れ替えて `wtr` に書く。
///
/// 途中でページが欠けていたら `TruncatedInput` を返す。それまでに書いたページは残る。
pub fn unshuffle_pages<R: Read, W: Write>(mut rdr: R, mut wtr: W, count: usize) -> Result<()> {
    debug!(count, "unshuffling pages");

    let mut page = [0; PAGE_SIZE];
    for i in 0..count {
        let len = read_full(&mut rdr, &mut page)?;
        if len != PAGE_SIZE {
            return Err(Error::TruncatedInput {
                page: i,
                count,
                len,
            });
        }

        unshuffle_page(&mut page);
        wtr.write_all(&page)?;
    }

    Ok(())
}

/// EOF に当たるまで `buf` を埋める。読めたバイト数を返す。
pub(crate) fn read_full<R: Read>(mut rdr: R, buf: &mut [u8]) -> io::Result<usize> {
    let mut len = 0;
    while len < buf.len() {
        match rdr.read(&mut buf[len..]) {
            Ok(0) => break,
            Ok(n) => len += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }

    Ok(len)
}
