use color_print::cstr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Chinese,
}

pub struct Localization<'a> {
    // About message and templates
    pub about_msg: &'a str,
    pub help_template: &'a str,

    // Argument descriptions
    pub game_dir_arg_desc: &'a str,
    pub output_dir_arg_desc: &'a str,
    pub syntax_tree_arg_desc: &'a str,
    pub decompiler_arg_desc: &'a str,
    pub marker_arg_desc: &'a str,
    pub language_arg_desc: &'a str,
    pub log_arg_desc: &'a str,
    pub help_arg_desc: &'a str,
    pub version_flag_desc: &'a str,

    // Argument types
    pub game_path_arg_type: &'a str,
    pub output_path_arg_type: &'a str,
    pub file_arg_type: &'a str,
    pub program_arg_type: &'a str,
    pub marker_arg_type: &'a str,
    pub language_arg_type: &'a str,

    // Fatal errors
    pub game_dir_missing_msg: &'a str,
    pub invalid_game_dir_msg: &'a str,
    pub invalid_managed_assembly_msg: &'a str,
    pub invalid_events_dir_msg: &'a str,
    pub invalid_asset_bundle_msg: &'a str,
    pub invalid_language_dir_msg: &'a str,
    pub syntax_tree_source_missing_msg: &'a str,
    pub decompile_failed_msg: &'a str,
    pub extract_failed_msg: &'a str,
    pub output_dir_create_failed_msg: &'a str,

    // Progress messages
    pub extracted_language_keys_msg: &'a str,
    pub saving_events_msg: &'a str,
    pub processing_language_files_msg: &'a str,
    pub parsed_template_msg: &'a str,
    pub stub_template_msg: &'a str,
    pub saved_file_msg: &'a str,
    pub copied_file_msg: &'a str,
    pub elapsed_time_msg: &'a str,
    pub logger_init_failed_msg: &'a str,

    // Recoverable problems
    pub template_parse_failed_msg: &'a str,
    pub key_collision_msg: &'a str,
    pub file_failed_msg: &'a str,
    pub failed_files_msg: &'a str,

    // Misc
    pub allowed_values: &'a str,
    pub example: &'a str,
    pub default_value: &'a str,
}

impl Localization<'_> {
    pub const fn new(language: Language) -> Self {
        match language {
            Language::English => Self::init_en(),
            Language::Chinese => Self::init_zh(),
        }
    }

    const fn init_en() -> Self {
        Localization {
            about_msg: cstr!(
                r#"<bold>Extracts The Scroll of Taiwu localization text. Rebuilds the language key table from the game assembly, resolves ui_language.txt through it, splits Adventure_language.txt into key/value pairs and flattens event-language templates into events.json.</>"#
            ),
            help_template: cstr!(
                "{about}\n\n<underline,bold>Usage:</> taiwu-txt-rs [OPTIONS] GAME_DIR\n\n<underline,bold>Arguments:</>\n{positionals}\n\n<underline,bold>Options:</>\n{options}"
            ),

            game_dir_arg_desc: "Game installation directory, containing \"The Scroll of Taiwu_Data\" and \"Event\" folders.",
            output_dir_arg_desc: "Output directory for the extracted files. Created if it does not exist.",
            syntax_tree_arg_desc: "JSON dump of the decompiled LanguageKey type.",
            decompiler_arg_desc: "Program that prints the JSON syntax tree of a type, invoked as PROGRAM ASSEMBLY TYPE_NAME. Used when --syntax-tree is not set.",
            marker_arg_desc: "Substring that marks key/value lines in Adventure_language.txt.",
            language_arg_desc: "Sets the localization of the tool to the selected language.",
            log_arg_desc: "Enables logging.",
            help_arg_desc: "Prints the program's help message.",
            version_flag_desc: "Show program's version.",

            game_path_arg_type: "GAME_DIR",
            output_path_arg_type: "OUTPUT_PATH",
            file_arg_type: "FILE",
            program_arg_type: "PROGRAM",
            marker_arg_type: "MARKER",
            language_arg_type: "LANGUAGE",

            game_dir_missing_msg: "Error: game directory is missing, pass game directory as the first argument!",
            invalid_game_dir_msg: "Invalid game directory:",
            invalid_managed_assembly_msg: "Invalid managed assembly:",
            invalid_events_dir_msg: "Invalid events directory:",
            invalid_asset_bundle_msg: "Invalid language_cn.uab:",
            invalid_language_dir_msg: "Could not find StreamingAssets language folder:",
            syntax_tree_source_missing_msg: "No syntax tree source: pass --syntax-tree or --decompiler.",
            decompile_failed_msg: "Could not decompile the LanguageKey type:",
            extract_failed_msg: "The LanguageKey type does not have the expected layout, this game version is not supported:",
            output_dir_create_failed_msg: "Could not create output directory:",

            extracted_language_keys_msg: "Extracted language keys:",
            saving_events_msg: "[+] Saving EventLanguages...",
            processing_language_files_msg: "[+] Processing StreamingAssets .txt files...",
            parsed_template_msg: "Parsed template.",
            stub_template_msg: "Group file without event text, nothing to extract.",
            saved_file_msg: "Saved.",
            copied_file_msg: "Copied unchanged.",
            elapsed_time_msg: "Elapsed time:",
            logger_init_failed_msg: "Could not initialize logging, warnings will not be shown:",

            template_parse_failed_msg: "Could not parse this event file. Check that it is not empty: it should contain fields such as EventGuid, EventContent or Option_1. A file that only holds Group, GroupName and Language is a stub without interesting text and can be ignored.",
            key_collision_msg: "Key is defined by more than one event, the later one is kept:",
            file_failed_msg: "Skipping file:",
            failed_files_msg: "Files that could not be processed:",

            allowed_values: "Allowed values:",
            example: "Example:",
            default_value: "Default value:",
        }
    }

    const fn init_zh() -> Self {
        Localization {
            about_msg: cstr!(
                r#"<bold>提取《太吾绘卷》的本地化文本。从游戏程序集中重建语言键表，据此解析 ui_language.txt，将 Adventure_language.txt 拆分为键值对，并把事件语言模板展开为 events.json。</>"#
            ),
            help_template: cstr!(
                "{about}\n\n<underline,bold>用法：</> taiwu-txt-rs [选项] 游戏目录\n\n<underline,bold>参数：</>\n{positionals}\n\n<underline,bold>选项：</>\n{options}"
            ),

            game_dir_arg_desc: "游戏安装目录，包含 \"The Scroll of Taiwu_Data\" 与 \"Event\" 文件夹。",
            output_dir_arg_desc: "提取文件的输出目录，不存在时会自动创建。",
            syntax_tree_arg_desc: "反编译得到的 LanguageKey 类型的 JSON 语法树文件。",
            decompiler_arg_desc: "输出类型 JSON 语法树的程序，调用方式为 PROGRAM ASSEMBLY TYPE_NAME。未指定 --syntax-tree 时使用。",
            marker_arg_desc: "Adventure_language.txt 中标记键值行的子串。",
            language_arg_desc: "设置工具界面语言。",
            log_arg_desc: "启用日志。",
            help_arg_desc: "显示帮助信息。",
            version_flag_desc: "显示程序版本。",

            game_path_arg_type: "游戏目录",
            output_path_arg_type: "输出路径",
            file_arg_type: "文件",
            program_arg_type: "程序",
            marker_arg_type: "标记",
            language_arg_type: "语言",

            game_dir_missing_msg: "错误：缺少游戏目录，请将游戏目录作为第一个参数传入！",
            invalid_game_dir_msg: "无效的游戏目录：",
            invalid_managed_assembly_msg: "无效的托管程序集：",
            invalid_events_dir_msg: "无效的事件目录：",
            invalid_asset_bundle_msg: "无效的 language_cn.uab：",
            invalid_language_dir_msg: "找不到 StreamingAssets 语言文件夹：",
            syntax_tree_source_missing_msg: "缺少语法树来源：请传入 --syntax-tree 或 --decompiler。",
            decompile_failed_msg: "无法反编译 LanguageKey 类型：",
            extract_failed_msg: "LanguageKey 类型的结构与预期不符，不支持此游戏版本：",
            output_dir_create_failed_msg: "无法创建输出目录：",

            extracted_language_keys_msg: "已提取语言键数量：",
            saving_events_msg: "[+] 正在保存 EventLanguages...",
            processing_language_files_msg: "[+] 正在处理 StreamingAssets 中的 .txt 文件...",
            parsed_template_msg: "模板解析完成。",
            stub_template_msg: "不含事件文本的分组文件，无需提取。",
            saved_file_msg: "已保存。",
            copied_file_msg: "已原样复制。",
            elapsed_time_msg: "耗时：",
            logger_init_failed_msg: "无法初始化日志，警告将不会显示：",

            template_parse_failed_msg: "无法解析此事件文件。请确认文件不为空：它应当包含 EventGuid、EventContent 或 Option_1 等字段。只含有 Group、GroupName 与 Language 的文件是不含有用文本的占位文件，可以忽略。",
            key_collision_msg: "多个事件定义了同一个键，保留后者：",
            file_failed_msg: "跳过文件：",
            failed_files_msg: "无法处理的文件数量：",

            allowed_values: "允许的值：",
            example: "示例：",
            default_value: "默认值：",
        }
    }
}
