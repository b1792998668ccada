//! 変換後イメージ (bbs.bin, rom.bin, nor.bin) のアドレッシング。

use std::io::{Read, Seek, SeekFrom};

use crate::error::*;
use crate::page::*;
use crate::profile::*;

/// bbs.bin はこの単位でマップされる。
pub const BBS_BANK_SIZE: usize = 0x2000;
pub const BBS_BANK_COUNT: usize = BBS_PAGE_COUNT * PAGE_SIZE / BBS_BANK_SIZE;

/// 変換後イメージ中の 1 単位 (ページまたは BBS バンク) の位置。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct PageLocation {
    pub offset: u64,
    pub len: usize,
}

impl Partition {
    /// ボリューム 1 個あたりの単位数。
    pub fn unit_count(self) -> usize {
        match self {
            Self::Bbs => BBS_BANK_COUNT,
            Self::Rom => ROM_VOLUME_PAGE_COUNT,
            Self::Nor => NOR_PAGE_COUNT,
        }
    }

    /// `volume` は ROM のみ意味を持つ。それ以外では 0 でなければならない。
    pub fn page_location(self, volume: usize, page: usize) -> Result<PageLocation> {
        let out_of_range = || Error::PageOutOfRange {
            partition: self,
            volume,
            page,
        };

        let (index, len) = match self {
            Self::Bbs => {
                if volume != 0 || page >= self.unit_count() {
                    return Err(out_of_range());
                }
                (page, BBS_BANK_SIZE)
            }
            Self::Rom => {
                if volume >= ROM_VOLUME_COUNT || page >= self.unit_count() {
                    return Err(out_of_range());
                }
                (volume * ROM_VOLUME_PAGE_COUNT + page, PAGE_SIZE)
            }
            Self::Nor => {
                if volume != 0 || page >= self.unit_count() {
                    return Err(out_of_range());
                }
                (page, PAGE_SIZE)
            }
        };

        Ok(PageLocation {
            offset: (index * len) as u64,
            len,
        })
    }

    /// 変換後イメージから 1 単位読む。
    pub fn read_page<R: Read + Seek>(self, mut rdr: R, volume: usize, page: usize) -> Result<Vec<u8>> {
        let loc = self.page_location(volume, page)?;

        rdr.seek(SeekFrom::Start(loc.offset))?;
        let mut buf = vec![0; loc.len];
        let len = read_full(&mut rdr, &mut buf)?;
        if len != loc.len {
            return Err(Error::TruncatedInput {
                page,
                count: self.unit_count(),
                len,
            });
        }

        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_locations() {
        assert_eq!(
            Partition::Rom.page_location(1, 2).unwrap(),
            PageLocation {
                offset: 0x82 * 0x8000,
                len: PAGE_SIZE
            }
        );
        assert_eq!(
            Partition::Bbs.page_location(0, 0xF).unwrap(),
            PageLocation {
                offset: 0x1_E000,
                len: 0x2000
            }
        );
        assert_eq!(
            Partition::Nor.page_location(0, 0x1F).unwrap().offset,
            0xF_8000
        );
    }

    #[test]
    fn test_locations_cover_output() {
        for &partition in &Partition::ALL {
            let volumes = if partition == Partition::Rom {
                ROM_VOLUME_COUNT
            } else {
                1
            };
            let last = (0..)
                .take_while(|&p| partition.page_location(volumes - 1, p).is_ok())
                .last()
                .unwrap();
            let loc = partition.page_location(volumes - 1, last).unwrap();

            assert_eq!(loc.offset + loc.len as u64, partition.output_len());
        }
    }

    #[test]
    fn test_out_of_range() {
        assert!(Partition::Rom.page_location(3, 0).is_err());
        assert!(Partition::Rom.page_location(0, 0x80).is_err());
        assert!(Partition::Bbs.page_location(0, 0x10).is_err());
        assert!(Partition::Bbs.page_location(1, 0).is_err());
        assert!(matches!(
            Partition::Nor.page_location(0, 0x20),
            Err(Error::PageOutOfRange {
                partition: Partition::Nor,
                volume: 0,
                page: 0x20
            })
        ));
    }

    #[test]
    fn test_rom_source_page() {
        assert_eq!(rom_source_page(0, 0), 0x80);
        assert_eq!(rom_source_page(1, 0), 0x180);
        assert_eq!(rom_source_page(2, 0x7F), 0x2FF);
    }

    #[test]
    fn test_read_page() {
        let img: Vec<u8> = (0..BBS_BANK_COUNT)
            .flat_map(|i| std::iter::repeat(i as u8).take(BBS_BANK_SIZE))
            .collect();

        let bank = Partition::Bbs.read_page(Cursor::new(&img), 0, 5).unwrap();
        assert_eq!(bank, vec![5; BBS_BANK_SIZE]);

        let err = Partition::Bbs
            .read_page(Cursor::new(&img[..img.len() - 1]), 0, 0xF)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedInput {
                page: 0xF,
                count: 0x10,
                len: 0x1FFF
            }
        ));
    }
}
