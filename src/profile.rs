use std::io::{Read, Seek, SeekFrom, Write};

use tracing::debug;

use crate::error::*;
use crate::page::*;

/// ROM ボリューム数。
pub const ROM_VOLUME_COUNT: usize = 3;
/// ROM ボリューム 1 個あたりのページ数。
pub const ROM_VOLUME_PAGE_COUNT: usize = 0x80;
/// ソース上の ROM ボリュームの間隔 (ページ数)。読むのは前半 0x80 ページのみ。
pub const ROM_VOLUME_STRIDE: usize = 0x100;

/// ボリューム 2 の後ろの未使用領域を含む、シミュレータ ROM イメージ全体のサイズ。
pub const ROM_IMAGE_LEN: u64 =
    (PAGE_SIZE * (ROM_VOLUME_PAGE_COUNT + ROM_VOLUME_COUNT * ROM_VOLUME_STRIDE)) as u64;

pub const BBS_PAGE_COUNT: usize = 4;
pub const NOR_PAGE_COUNT: usize = 0x20;

/// シャッフルされたページ列の位置。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Profile {
    pub source_offset: u64,
    pub page_count: usize,
}

impl Profile {
    pub const fn new(source_offset: u64, page_count: usize) -> Self {
        Self {
            source_offset,
            page_count,
        }
    }

    pub const fn byte_len(&self) -> u64 {
        (PAGE_SIZE * self.page_count) as u64
    }

    pub const fn end(&self) -> u64 {
        self.source_offset + self.byte_len()
    }

    /// `src` を `source_offset` に seek し、`page_count` ページを unshuffle して `dst` に書く。
    pub fn extract<R: Read + Seek, W: Write>(&self, mut src: R, dst: W) -> Result<u64> {
        src.seek(SeekFrom::Start(self.source_offset))?;
        unshuffle_pages(src, dst, self.page_count)?;

        Ok(self.byte_len())
    }
}

pub const BBS_PROFILE: Profile = Profile::new(0, BBS_PAGE_COUNT);

pub const ROM_PROFILES: [Profile; ROM_VOLUME_COUNT] = [
    rom_volume_profile(0),
    rom_volume_profile(1),
    rom_volume_profile(2),
];

pub const NOR_PROFILE: Profile = Profile::new(0, NOR_PAGE_COUNT);

const fn rom_volume_profile(volume: usize) -> Profile {
    let page = rom_source_page(volume, 0);

    Profile::new((PAGE_SIZE * page) as u64, ROM_VOLUME_PAGE_COUNT)
}

/// ROM の (volume, page) がシミュレータイメージ上で何ページ目にあるか。
pub const fn rom_source_page(volume: usize, page: usize) -> usize {
    ROM_VOLUME_PAGE_COUNT + volume * ROM_VOLUME_STRIDE + page
}

/// どちらのシミュレータイメージから読むか。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SourceImage {
    /// obj_lu.bin
    Rom,
    /// nc1020.fls
    Nor,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Partition {
    Bbs,
    Rom,
    Nor,
}

impl Partition {
    pub const ALL: [Self; 3] = [Self::Bbs, Self::Rom, Self::Nor];

    pub fn profiles(self) -> &'static [Profile] {
        match self {
            Self::Bbs => &[BBS_PROFILE],
            Self::Rom => &ROM_PROFILES,
            Self::Nor => &[NOR_PROFILE],
        }
    }

    pub fn source(self) -> SourceImage {
        match self {
            Self::Bbs | Self::Rom => SourceImage::Rom,
            Self::Nor => SourceImage::Nor,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bbs => "bbs",
            Self::Rom => "rom",
            Self::Nor => "nor",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Bbs => "bbs.bin",
            Self::Rom => "rom.bin",
            Self::Nor => "nor.bin",
        }
    }

    /// 成功時の出力サイズ。
    pub fn output_len(self) -> u64 {
        self.profiles().iter().map(Profile::byte_len).sum()
    }

    /// 全プロファイルを読むのに必要なソースの最小サイズ。
    pub fn min_source_len(self) -> u64 {
        self.profiles().iter().map(Profile::end).max().unwrap_or(0)
    }

    /// プロファイルを順に処理し、結果を `dst` に連結する。書いたバイト数を返す。
    pub fn extract<R: Read + Seek, W: Write>(self, mut src: R, mut dst: W) -> Result<u64> {
        let mut written = 0;
        for (i, profile) in itertools::enumerate(self.profiles()) {
            debug!(
                partition = ?self,
                index = i,
                offset = profile.source_offset,
                pages = profile.page_count,
                "extracting"
            );
            written += profile.extract(&mut src, &mut dst)?;
        }

        Ok(written)
    }

    pub fn extract_to_vec<R: Read + Seek>(self, src: R) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.output_len() as usize);
        self.extract(src, &mut buf)?;

        Ok(buf)
    }
}

pub fn extract_bbs<R: Read + Seek>(src: R) -> Result<Vec<u8>> {
    Partition::Bbs.extract_to_vec(src)
}

pub fn extract_rom<R: Read + Seek>(src: R) -> Result<Vec<u8>> {
    Partition::Rom.extract_to_vec(src)
}

pub fn extract_nor<R: Read + Seek>(src: R) -> Result<Vec<u8>> {
    Partition::Nor.extract_to_vec(src)
}
