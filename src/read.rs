use crate::{
    functions::{file_stem, list_txt_files, read_game_text, split_game_lines, write_json, write_text},
    localization::Localization,
    resolve::{resolve_indexed_lines, KeyValueResolution, KeyValueResolver},
    statics::{ADVENTURE_LANGUAGE_STEM, DEFAULT_KEY_MARKER, EVENTS_OUTPUT_FILE, UI_LANGUAGE_STEM},
    template::{flatten_records, FlattenedEvents, TemplateRecord},
    types::{Error, Outcome, ResultVec, StringMap, SymbolTable},
};
use log::{error, info, warn};
use std::{
    fs::read,
    path::{Path, PathBuf},
};

pub struct ReaderBuilder<'a> {
    localization: &'a Localization<'a>,
    logging: bool,
    marker: &'a str,
}

impl<'a> ReaderBuilder<'a> {
    pub fn new(localization: &'a Localization<'a>) -> Self {
        Self {
            localization,
            logging: false,
            marker: DEFAULT_KEY_MARKER,
        }
    }

    pub fn logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }

    /// Marker that identifies key/value lines in `Adventure_language.txt`.
    pub fn marker(mut self, marker: &'a str) -> Self {
        self.marker = marker;
        self
    }

    pub fn build(self) -> Reader<'a> {
        Reader {
            localization: self.localization,
            logging: self.logging,
            marker: self.marker,
        }
    }
}

/// Reads the game's text resources and writes their extracted form to an output directory.
///
/// Every file is processed on its own: a failure is logged, returned in the result list
/// and does not stop the remaining files.
pub struct Reader<'a> {
    localization: &'a Localization<'a>,
    logging: bool,
    marker: &'a str,
}

impl Reader<'_> {
    fn parse_template(&self, path: &Path) -> Result<TemplateRecord, Error> {
        let text: String = read_game_text(path)?;

        TemplateRecord::parse(&text).map_err(|err| Error::TemplateParseFailed {
            file: path.to_path_buf(),
            err,
        })
    }

    /// Parses every template of `events_path` and writes the flattened entries to `events.json`.
    pub fn read_events(&self, events_path: &Path, output_path: &Path) -> ResultVec {
        let files: Vec<PathBuf> = match list_txt_files(events_path) {
            Ok(files) => files,
            Err(err) => return vec![Err(err)],
        };

        let mut results: ResultVec = Vec::with_capacity(files.len() + 1);
        let mut records: Vec<TemplateRecord> = Vec::with_capacity(files.len());

        for file in files {
            match self.parse_template(&file) {
                Ok(record) => {
                    if self.logging {
                        let msg: &str = if record.is_stub() {
                            self.localization.stub_template_msg
                        } else {
                            self.localization.parsed_template_msg
                        };

                        info!("{}: {msg}", file.display());
                    }

                    records.push(record);
                    results.push(Ok(Outcome::ParsedTemplate(file)));
                }
                Err(err) => {
                    warn!("{err}\n{}", self.localization.template_parse_failed_msg);
                    results.push(Err(err));
                }
            }
        }

        let flattened: FlattenedEvents = flatten_records(&records);

        for key in &flattened.collisions {
            warn!("{} {key}", self.localization.key_collision_msg);
        }

        let output_file: PathBuf = output_path.join(EVENTS_OUTPUT_FILE);
        results.push(write_json(&output_file, &flattened.entries).map(|()| Outcome::ResolvedFile {
            file: output_file,
            entries: flattened.entries.len(),
        }));

        results
    }

    /// Routes every `*.txt` file of the streaming-assets language directory by its file stem.
    pub fn read_language(&self, language_path: &Path, symbols: &SymbolTable, output_path: &Path) -> ResultVec {
        let files: Vec<PathBuf> = match list_txt_files(language_path) {
            Ok(files) => files,
            Err(err) => return vec![Err(err)],
        };

        files
            .iter()
            .map(|file: &PathBuf| {
                let result: Result<Outcome, Error> = self.read_language_file(file, symbols, output_path);

                match &result {
                    Ok(outcome) => {
                        if self.logging {
                            let msg: &str = if matches!(outcome, Outcome::CopiedFile(_)) {
                                self.localization.copied_file_msg
                            } else {
                                self.localization.saved_file_msg
                            };

                            info!("{}: {msg}", file.display());
                        }
                    }
                    Err(err) => error!("{} {err}", self.localization.file_failed_msg),
                }

                result
            })
            .collect()
    }

    fn read_language_file(&self, file: &Path, symbols: &SymbolTable, output_path: &Path) -> Result<Outcome, Error> {
        let stem: String = file_stem(file);

        if stem == UI_LANGUAGE_STEM {
            let lines: Vec<String> = split_game_lines(&read_game_text(file)?);
            let resolved: StringMap = resolve_indexed_lines(symbols, &lines);

            let output_file: PathBuf = output_path.join(format!("{stem}.json"));
            write_json(&output_file, &resolved)?;

            Ok(Outcome::ResolvedFile {
                file: output_file,
                entries: resolved.len(),
            })
        } else if stem == ADVENTURE_LANGUAGE_STEM {
            let lines: Vec<String> = split_game_lines(&read_game_text(file)?);
            let resolution: KeyValueResolution = KeyValueResolver::new(self.marker).resolve(&lines);

            let output_file: PathBuf = output_path.join(format!("{stem}.json"));
            write_json(&output_file, &resolution.table)?;
            write_text(&output_path.join(format!("{stem}.txt")), resolution.residual)?;

            Ok(Outcome::ResolvedFile {
                file: output_file,
                entries: resolution.table.len(),
            })
        } else {
            let bytes: Vec<u8> = read(file).map_err(|err| Error::ReadFileFailed {
                file: file.to_path_buf(),
                err,
            })?;

            let output_file: PathBuf = output_path.join(format!("{stem}.txt"));
            write_text(&output_file, bytes)?;

            Ok(Outcome::CopiedFile(output_file))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::Language;
    use std::fs::{create_dir, read_to_string, write};

    const LOCALIZATION: Localization<'static> = Localization::new(Language::English);

    fn symbols(entries: &[(&str, usize)]) -> SymbolTable {
        entries
            .iter()
            .map(|(key, line_index)| ((*key).to_owned(), *line_index))
            .collect()
    }

    fn write_events(dir: &Path) {
        write(
            dir.join("a_village.txt"),
            "- Group : Village\n- EventGuid : e-a\n- EventContent : 太吾村\n- Option_1 : 进村\n",
        )
        .unwrap();
        write(dir.join("b_empty.txt"), "").unwrap();
        write(
            dir.join("c_sword.txt"),
            "- EventGuid : e-c\n- EventContent : 剑冢\n- Option_1 : 拔剑\n- Option_2 : 离开\n",
        )
        .unwrap();
        write(
            dir.join("d_stub.txt"),
            "- Group : InjectionInteractOption\n- GroupName : 注入\n- Language : CN\n",
        )
        .unwrap();
        write(dir.join("notes.md"), "- EventGuid : ignored\n").unwrap();
    }

    #[test]
    fn bad_template_does_not_abort_the_batch() {
        let events = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_events(events.path());

        let results = ReaderBuilder::new(&LOCALIZATION)
            .build()
            .read_events(events.path(), output.path());

        assert_eq!(results.len(), 5);

        let failures: Vec<&Error> = results.iter().filter_map(|result| result.as_ref().err()).collect();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].to_string().contains("b_empty.txt"));
        assert!(matches!(failures[0], Error::TemplateParseFailed { file, .. } if file.ends_with("b_empty.txt")));

        let events_json = read_to_string(output.path().join("events.json")).unwrap();
        let flattened: StringMap = sonic_rs::from_str(&events_json).unwrap();
        assert_eq!(
            flattened.keys().map(String::as_str).collect::<Vec<_>>(),
            vec![
                "e-a.EventGuid",
                "e-a.EventContent",
                "e-a.Option_1.OptionContent",
                "e-c.EventGuid",
                "e-c.EventContent",
                "e-c.Option_1.OptionContent",
                "e-c.Option_2.OptionContent",
            ]
        );
        assert_eq!(flattened["e-c.Option_1.OptionContent"], "拔剑");

        assert_eq!(
            results.last().unwrap().as_ref().unwrap(),
            &Outcome::ResolvedFile {
                file: output.path().join("events.json"),
                entries: 7,
            }
        );
    }

    #[test]
    fn stub_templates_parse_without_entries() {
        let events = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(
            events.path().join("stub.txt"),
            "- Group : InjectionInteractOption\n- GroupName : 注入\n- Language : CN\n",
        )
        .unwrap();

        let results = ReaderBuilder::new(&LOCALIZATION)
            .logging(true)
            .build()
            .read_events(events.path(), output.path());

        assert_eq!(
            results[0].as_ref().unwrap(),
            &Outcome::ParsedTemplate(events.path().join("stub.txt"))
        );
        assert_eq!(read_to_string(output.path().join("events.json")).unwrap(), "{}");
    }

    #[test]
    fn missing_events_directory_is_a_single_failure() {
        let output = tempfile::tempdir().unwrap();
        let results = ReaderBuilder::new(&LOCALIZATION)
            .build()
            .read_events(&output.path().join("missing"), output.path());

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(Error::ReadDirFailed { .. })));
        assert!(!output.path().join("events.json").exists());
    }

    fn write_language(dir: &Path) {
        write(dir.join("ui_language.txt"), "确定\r\n  取消  \r\n太吾\\n传人\r\n").unwrap();
        write(
            dir.join("Adventure_language.txt"),
            ">>>>>>>>>>>>>>>>>> 奇遇\nLK_Adv_Name=剑冢\n序章\nLK_Adv_Bad=a=b\n",
        )
        .unwrap();

        let (gbk, _, _) = encoding_rs::GB18030.encode("其他文本\n");
        write(dir.join("other_language.txt"), &*gbk).unwrap();
    }

    #[test]
    fn language_files_are_routed_by_stem() {
        let language = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_language(language.path());

        let symbols = symbols(&[("LK_Confirm", 0), ("LK_Cancel", 1), ("LK_Heir", 2), ("LK_Missing", 40)]);
        let results = ReaderBuilder::new(&LOCALIZATION)
            .marker("LK_")
            .build()
            .read_language(language.path(), &symbols, output.path());

        assert!(results.iter().all(Result::is_ok));
        assert_eq!(results.len(), 3);

        let ui: StringMap = sonic_rs::from_str(&read_to_string(output.path().join("ui_language.json")).unwrap()).unwrap();
        assert_eq!(
            ui.into_iter().collect::<Vec<_>>(),
            vec![
                (String::from("LK_Confirm"), String::from("确定")),
                (String::from("LK_Cancel"), String::from("取消")),
                (String::from("LK_Heir"), String::from("太吾\n传人")),
                (String::from("LK_Missing"), String::from("<INVALID_INDEX_40>")),
            ]
        );

        let adventure: StringMap =
            sonic_rs::from_str(&read_to_string(output.path().join("Adventure_language.json")).unwrap()).unwrap();
        assert_eq!(adventure.len(), 1);
        assert_eq!(adventure["LK_Adv_Name"], "剑冢");
        assert_eq!(
            read_to_string(output.path().join("Adventure_language.txt")).unwrap(),
            "序章\n\n"
        );

        assert_eq!(
            read(output.path().join("other_language.txt")).unwrap(),
            read(language.path().join("other_language.txt")).unwrap()
        );
    }

    #[test]
    fn every_language_key_appears_once_in_ui_output() {
        let language = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(language.path().join("ui_language.txt"), "甲\n乙\n").unwrap();

        let symbols = symbols(&[("LK_B", 1), ("LK_A", 0), ("LK_C", 7)]);
        ReaderBuilder::new(&LOCALIZATION)
            .build()
            .read_language(language.path(), &symbols, output.path());

        let json = read_to_string(output.path().join("ui_language.json")).unwrap();
        for key in symbols.keys() {
            assert_eq!(json.matches(&format!("\"{key}\":")).count(), 1);
        }
    }

    #[test]
    fn failed_file_does_not_stop_the_rest() {
        let language = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(language.path().join("a_broken.txt"), "甲").unwrap();
        write(language.path().join("b_fine.txt"), "乙").unwrap();
        create_dir(output.path().join("a_broken.txt")).unwrap();

        let results = ReaderBuilder::new(&LOCALIZATION)
            .build()
            .read_language(language.path(), &SymbolTable::default(), output.path());

        assert!(matches!(results[0], Err(Error::WriteFileFailed { .. })));
        assert_eq!(
            results[1].as_ref().unwrap(),
            &Outcome::CopiedFile(output.path().join("b_fine.txt"))
        );
        assert_eq!(read_to_string(output.path().join("b_fine.txt")).unwrap(), "乙");
    }

    #[test]
    fn repeated_runs_are_byte_identical() {
        let events = tempfile::tempdir().unwrap();
        let language = tempfile::tempdir().unwrap();
        write_events(events.path());
        write_language(language.path());
        let symbols = symbols(&[("LK_Confirm", 0), ("LK_Cancel", 1)]);

        let run = || -> Vec<(String, Vec<u8>)> {
            let output = tempfile::tempdir().unwrap();
            let reader = ReaderBuilder::new(&LOCALIZATION).build();
            reader.read_events(events.path(), output.path());
            reader.read_language(language.path(), &symbols, output.path());

            let mut files: Vec<(String, Vec<u8>)> = std::fs::read_dir(output.path())
                .unwrap()
                .flatten()
                .map(|entry| (entry.file_name().to_string_lossy().into_owned(), read(entry.path()).unwrap()))
                .collect();
            files.sort();
            files
        };

        let first = run();
        assert_eq!(first.len(), 5);
        assert_eq!(first, run());
    }
}
