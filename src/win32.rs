//! Win32 backend: GDI primitives for the decoder and the shell's system
//! image lists as the icon handle source.

use std::ffi::{OsStr, c_void};
use std::os::windows::ffi::OsStrExt;
use std::path::Path;

use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Gdi::{
    BI_RGB, BITMAP, BITMAPINFO, BITMAPINFOHEADER, DIB_RGB_COLORS, DeleteObject, GetDC, GetDIBits,
    GetObjectW, HBITMAP, HDC, ReleaseDC,
};
use windows::Win32::Storage::FileSystem::FILE_ATTRIBUTE_NORMAL;
use windows::Win32::System::Com::{COINIT_APARTMENTTHREADED, CoInitializeEx};
use windows::Win32::UI::Controls::{ILD_TRANSPARENT, IImageList};
use windows::Win32::UI::Shell::{
    SHFILEINFOW, SHGFI_SYSICONINDEX, SHGetFileInfoW, SHGetImageList, SHIL_EXTRALARGE, SHIL_JUMBO,
    SHIL_LARGE, SHIL_SMALL,
};
use windows::Win32::UI::WindowsAndMessaging::{DestroyIcon, GetIconInfo, HICON, ICONINFO};
use windows::core::PCWSTR;

use crate::config::IconSize;
use crate::decoder::{BitmapDescriptor, GdiApi, IconInfo};
use crate::error::{Error, Result};
use crate::provider::HandleProvider;

/// GDI and USER32 calls backing the decoder.
#[derive(Debug, Default, Copy, Clone)]
pub struct Win32Gdi;

impl GdiApi for Win32Gdi {
    type Icon = HICON;
    type Bitmap = HBITMAP;
    type Dc = HDC;

    fn icon_info(&self, icon: &HICON) -> Option<IconInfo<HBITMAP>> {
        let mut info = ICONINFO::default();
        unsafe { GetIconInfo(*icon, &mut info) }.ok()?;

        Some(IconInfo {
            color: (!info.hbmColor.is_invalid()).then_some(info.hbmColor),
            mask: (!info.hbmMask.is_invalid()).then_some(info.hbmMask),
        })
    }

    fn probe(&self, bitmap: &HBITMAP) -> Option<BitmapDescriptor> {
        let mut header = BITMAP::default();
        let read = unsafe {
            GetObjectW(
                *bitmap,
                std::mem::size_of::<BITMAP>() as i32,
                Some(&mut header as *mut BITMAP as *mut c_void),
            )
        };
        if read == 0 {
            return None;
        }

        Some(BitmapDescriptor {
            width: header.bmWidth,
            height: header.bmHeight,
            bit_count: header.bmBitsPixel,
            planes: header.bmPlanes,
        })
    }

    fn screen_dc(&self) -> Option<HDC> {
        let hdc = unsafe { GetDC(HWND::default()) };
        (!hdc.is_invalid()).then_some(hdc)
    }

    fn fetch_bits(
        &self,
        dc: &HDC,
        bitmap: &HBITMAP,
        desc: &BitmapDescriptor,
        dest: &mut [u8],
    ) -> i32 {
        // Positive height: bottom-up rows, flipped by the decoder.
        let mut bmi = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: desc.width,
                biHeight: desc.height,
                biPlanes: desc.planes,
                biBitCount: desc.bit_count,
                biCompression: BI_RGB.0,
                biSizeImage: 0,
                biXPelsPerMeter: 0,
                biYPelsPerMeter: 0,
                biClrUsed: 0,
                biClrImportant: 0,
            },
            bmiColors: [Default::default()],
        };

        unsafe {
            GetDIBits(
                *dc,
                *bitmap,
                0,
                desc.height as u32,
                Some(dest.as_mut_ptr() as *mut c_void),
                &mut bmi,
                DIB_RGB_COLORS,
            )
        }
    }

    fn release_dc(&self, dc: &HDC) {
        unsafe {
            ReleaseDC(HWND::default(), *dc);
        }
    }

    fn delete_bitmap(&self, bitmap: &HBITMAP) {
        unsafe {
            let _ = DeleteObject(*bitmap);
        }
    }

    fn destroy_icon(&self, icon: &HICON) {
        unsafe {
            let _ = DestroyIcon(*icon);
        }
    }
}

fn image_list_kind(size: IconSize) -> i32 {
    (match size {
        IconSize::Small => SHIL_SMALL,
        IconSize::Large => SHIL_LARGE,
        IconSize::ExtraLarge => SHIL_EXTRALARGE,
        IconSize::Jumbo => SHIL_JUMBO,
    }) as i32
}

fn to_wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
}

/// Icon handles from the shell's system image list of one resolution.
#[derive(Debug)]
pub struct ShellIconProvider {
    size: IconSize,
    image_list: i32,
    gdi: Win32Gdi,
}

impl ShellIconProvider {
    /// Make sure the image list for `size` can be obtained, trying up to
    /// `attempts` times and initializing COM on this thread between tries.
    pub fn new(size: IconSize, attempts: u32) -> Result<Self> {
        let image_list = image_list_kind(size);
        let attempts = attempts.max(1);

        for attempt in 1..=attempts {
            match unsafe { SHGetImageList::<IImageList>(image_list) } {
                Ok(_) => {
                    log::debug!("shell image list {size:?} ready after {attempt} attempt(s)");
                    return Ok(ShellIconProvider {
                        size,
                        image_list,
                        gdi: Win32Gdi,
                    });
                }
                Err(e) => {
                    log::warn!("shell image list {size:?} attempt {attempt}/{attempts}: {e}");
                    unsafe {
                        let _ = CoInitializeEx(None, COINIT_APARTMENTTHREADED);
                    }
                }
            }
        }

        let reason = format!("shell image list {size:?} could not be loaded");
        log::error!("icon retrieval unavailable: {reason}");
        Err(Error::ProviderUnavailable(reason))
    }

    pub fn size(&self) -> IconSize {
        self.size
    }
}

impl HandleProvider for ShellIconProvider {
    type Gdi = Win32Gdi;

    fn gdi(&self) -> &Win32Gdi {
        &self.gdi
    }

    fn acquire(&self, path: &Path) -> Option<HICON> {
        let wide_path = to_wide(path.as_os_str());
        let mut shfi = SHFILEINFOW::default();
        let result = unsafe {
            SHGetFileInfoW(
                PCWSTR(wide_path.as_ptr()),
                FILE_ATTRIBUTE_NORMAL,
                Some(&mut shfi),
                std::mem::size_of::<SHFILEINFOW>() as u32,
                SHGFI_SYSICONINDEX,
            )
        };
        if result == 0 {
            return None;
        }

        let image_list: IImageList = unsafe { SHGetImageList(self.image_list) }.ok()?;
        let icon = unsafe { image_list.GetIcon(shfi.iIcon, ILD_TRANSPARENT.0) }.ok()?;
        (!icon.is_invalid()).then_some(icon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{DecodingProvider, IconProvider};

    #[test]
    fn decodes_a_real_file_icon() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let provider = DecodingProvider::new(ShellIconProvider::new(IconSize::Jumbo, 3).unwrap());
        let pixels = provider.icon_pixels(&path).unwrap();
        assert_eq!(
            pixels.as_bytes().len(),
            (pixels.width() * pixels.height() * 4) as usize
        );
    }

    #[test]
    fn directories_have_icons() {
        let dir = tempfile::tempdir().unwrap();
        let provider =
            DecodingProvider::new(ShellIconProvider::new(IconSize::ExtraLarge, 3).unwrap());
        assert!(provider.icon_pixels(dir.path()).is_some());
    }
}
