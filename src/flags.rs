//! Named boolean records for the bit-field words of a shell link
//!
//! Each record maps one bit to one field. `from_bits` and `bits` are inverse for
//! every bit the record names.

use serde::{Deserialize, Serialize};

/// Declare a record of named booleans over a 32-bit word
macro_rules! bit_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$field_meta:meta])* $field:ident = $bit:expr, $label:literal; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            $( $(#[$field_meta])* pub $field: bool, )+
        }

        impl $name {
            /// Every bit this record names
            pub const MASK: u32 = 0 $( | $bit )+;

            /// Derive the record from a raw word
            pub fn from_bits(bits: u32) -> Self {
                Self {
                    $( $field: bits & $bit != 0, )+
                }
            }

            /// Rebuild the raw word from the record
            pub fn bits(&self) -> u32 {
                let mut bits = 0;
                $( if self.$field { bits |= $bit; } )+
                bits
            }

            /// Format names of the set bits, lowest bit first
            pub fn names(&self) -> Vec<&'static str> {
                let mut names = Vec::new();
                $( if self.$field { names.push($label); } )+
                names
            }
        }
    };
}

pub(crate) use bit_record;

bit_record! {
    /// LinkFlags from the shell link header
    pub struct LinkFlags {
        /// A LinkTargetIDList follows the header
        has_link_target_id_list = 0x0000_0001, "HasLinkTargetIDList";
        /// A LinkInfo structure is present
        has_link_info = 0x0000_0002, "HasLinkInfo";
        has_name = 0x0000_0004, "HasName";
        has_relative_path = 0x0000_0008, "HasRelativePath";
        has_working_dir = 0x0000_0010, "HasWorkingDir";
        has_arguments = 0x0000_0020, "HasArguments";
        has_icon_location = 0x0000_0040, "HasIconLocation";
        /// StringData is UTF-16 rather than the legacy code page
        is_unicode = 0x0000_0080, "IsUnicode";
        force_no_link_info = 0x0000_0100, "ForceNoLinkInfo";
        has_exp_string = 0x0000_0200, "HasExpString";
        run_in_separate_process = 0x0000_0400, "RunInSeparateProcess";
        unused1 = 0x0000_0800, "Unused1";
        has_darwin_id = 0x0000_1000, "HasDarwinID";
        run_as_user = 0x0000_2000, "RunAsUser";
        has_exp_icon = 0x0000_4000, "HasExpIcon";
        no_pidl_alias = 0x0000_8000, "NoPidlAlias";
        unused2 = 0x0001_0000, "Unused2";
        run_with_shim_layer = 0x0002_0000, "RunWithShimLayer";
        force_no_link_track = 0x0004_0000, "ForceNoLinkTrack";
        enable_target_metadata = 0x0008_0000, "EnableTargetMetadata";
        disable_link_path_tracking = 0x0010_0000, "DisableLinkPathTracking";
        disable_known_folder_tracking = 0x0020_0000, "DisableKnownFolderTracking";
        disable_known_folder_alias = 0x0040_0000, "DisableKnownFolderAlias";
        allow_link_to_link = 0x0080_0000, "AllowLinkToLink";
        unalias_on_save = 0x0100_0000, "UnaliasOnSave";
        prefer_environment_path = 0x0200_0000, "PreferEnvironmentPath";
        keep_local_id_list_for_unc_target = 0x0400_0000, "KeepLocalIDListForUNCTarget";
        reserved = 0x0800_0000, "Reserved";
        html_no_sub_dir_creation = 0x1000_0000, "HTMLNoSubDirCreation";
        disallow_user_view = 0x2000_0000, "DisallowUserView";
        force_perceived_type_system = 0x4000_0000, "ForcePerceivedTypeSystem";
        include_slow_info = 0x8000_0000, "IncludeSlowInfo";
    }
}

impl LinkFlags {
    /// True if any StringData field is present
    pub fn has_string_data(&self) -> bool {
        self.has_name || self.has_relative_path || self.has_working_dir || self.has_arguments || self.has_icon_location
    }
}

bit_record! {
    /// FileAttributes of the link target
    pub struct FileAttributes {
        read_only = 0x0000_0001, "FILE_ATTRIBUTE_READONLY";
        hidden = 0x0000_0002, "FILE_ATTRIBUTE_HIDDEN";
        system = 0x0000_0004, "FILE_ATTRIBUTE_SYSTEM";
        /// Reserved1, always zero in well-formed files
        volume_label = 0x0000_0008, "FILE_ATTRIBUTE_VOLUME_LABEL";
        directory = 0x0000_0010, "FILE_ATTRIBUTE_DIRECTORY";
        archive = 0x0000_0020, "FILE_ATTRIBUTE_ARCHIVE";
        reserved2 = 0x0000_0040, "FILE_ATTRIBUTE_RESERVED2";
        normal = 0x0000_0080, "FILE_ATTRIBUTE_NORMAL";
        temporary = 0x0000_0100, "FILE_ATTRIBUTE_TEMPORARY";
        sparse_file = 0x0000_0200, "FILE_ATTRIBUTE_SPARSE_FILE";
        reparse_point = 0x0000_0400, "FILE_ATTRIBUTE_REPARSE_POINT";
        compressed = 0x0000_0800, "FILE_ATTRIBUTE_COMPRESSED";
        offline = 0x0000_1000, "FILE_ATTRIBUTE_OFFLINE";
        not_content_indexed = 0x0000_2000, "FILE_ATTRIBUTE_NOT_CONTENT_INDEXED";
        encrypted = 0x0000_4000, "FILE_ATTRIBUTE_ENCRYPTED";
    }
}
