//! `ISteamApps` interface. Recorded servers never call into it, so every
//! member fails.

use crate::engine::Player;
use extplay_core::{PlaybackError, PlaybackResult};
use std::marker::PhantomData;

/// Apps interface bound to a running player.
///
/// No member reaches the trace, so the player is only held borrowed to keep
/// the interface from outliving it.
#[derive(Debug)]
pub struct SteamApps<'a> {
    _player: PhantomData<&'a mut Player>,
}

macro_rules! unsupported {
    ($( $method:ident => $caller:literal ( $($arg:ident : $ty:ty),* ) -> $ret:ty; )*) => {
        $(
            #[doc = concat!("`", $caller, "()`")]
            ///
            /// # Errors
            ///
            /// Always returns `Unsupported`
            #[allow(unused_variables)]
            pub fn $method(&mut self, $($arg: $ty),*) -> PlaybackResult<$ret> {
                Err(PlaybackError::Unsupported { caller: $caller })
            }
        )*
    };
}

impl<'a> SteamApps<'a> {
    pub(crate) fn new(_player: &'a mut Player) -> Self {
        Self {
            _player: PhantomData,
        }
    }

    unsupported! {
        b_is_subscribed => "BIsSubscribed"() -> bool;
        b_is_low_violence => "BIsLowViolence"() -> bool;
        b_is_cybercafe => "BIsCybercafe"() -> bool;
        b_is_vac_banned => "BIsVACBanned"() -> bool;
        get_current_game_language => "GetCurrentGameLanguage"() -> String;
        get_available_game_languages => "GetAvailableGameLanguages"() -> String;
        b_is_subscribed_app => "BIsSubscribedApp"(app_id: u32) -> bool;
        b_is_dlc_installed => "BIsDlcInstalled"(app_id: u32) -> bool;
        get_earliest_purchase_unix_time => "GetEarliestPurchaseUnixTime"(app_id: u32) -> u32;
        b_is_subscribed_from_free_weekend => "BIsSubscribedFromFreeWeekend"() -> bool;
        get_dlc_count => "GetDLCCount"() -> i32;
        b_get_dlc_data_by_index => "BGetDLCDataByIndex"(index: i32, name: &mut [u8]) -> (bool, u32, bool);
        install_dlc => "InstallDLC"(app_id: u32) -> ();
        uninstall_dlc => "UninstallDLC"(app_id: u32) -> ();
        request_app_proof_of_purchase_key => "RequestAppProofOfPurchaseKey"(app_id: u32) -> ();
        get_current_beta_name => "GetCurrentBetaName"(name: &mut [u8]) -> bool;
        mark_content_corrupt => "MarkContentCorrupt"(missing_files_only: bool) -> bool;
        get_installed_depots => "GetInstalledDepots"(depots: &mut [u32]) -> u32;
        get_app_install_dir => "GetAppInstallDir"(app_id: u32, folder: &mut [u8]) -> u32;
    }
}
