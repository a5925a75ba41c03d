use std::borrow::Cow;

use teloxide::types::{MessageEntity, MessageEntityKind, User};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MessageText<'a> {
    text: Cow<'a, str>,
    entities: Cow<'a, [MessageEntity]>,
}

impl<'a> MessageText<'a> {
    pub fn new(
        text: impl Into<Cow<'a, str>>,
        entities: impl Into<Cow<'a, [MessageEntity]>>,
    ) -> Self {
        Self {
            text: text.into(),
            entities: entities.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn entities(&self) -> &[MessageEntity] {
        &self.entities
    }

    pub fn into_parts(self) -> (String, Vec<MessageEntity>) {
        (self.text.into_owned(), self.entities.into_owned())
    }

    pub fn append_text(&mut self, text: impl AsRef<str>) {
        self.text.to_mut().push_str(text.as_ref())
    }

    pub fn append_text_with_entity(&mut self, text: impl AsRef<str>, kind: MessageEntityKind) {
        self.entities.to_mut().push(MessageEntity {
            kind,
            offset: utf16_len(&self.text),
            length: utf16_len(text.as_ref()),
        });
        self.append_text(text);
    }

    /// Mentions `user` by `@username`, or by a text mention of their name
    /// when they have none.
    pub fn append_user(&mut self, user: &User) {
        match &user.username {
            Some(username) => self.append_text(format!("@{username}")),
            None => self.append_text_with_entity(
                user.full_name(),
                MessageEntityKind::TextMention { user: user.clone() },
            ),
        }
    }

    /// Inserts plain `prefix` at the front, shifting existing entities.
    pub fn prepend_text(&mut self, prefix: impl AsRef<str>) {
        let prefix = prefix.as_ref();
        let shift = utf16_len(prefix);

        self.text.to_mut().insert_str(0, prefix);
        for entity in self.entities.to_mut() {
            entity.offset += shift;
        }
    }
}

impl<'a> From<&'a str> for MessageText<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(text, Vec::new())
    }
}

impl From<String> for MessageText<'_> {
    fn from(text: String) -> Self {
        Self::new(text, Vec::new())
    }
}

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

pub struct MessageTextBuilder<'a> {
    inner: MessageText<'a>,
}

pub fn mtb<'a>() -> MessageTextBuilder<'a> {
    MessageTextBuilder {
        inner: MessageText::default(),
    }
}

impl<'a> MessageTextBuilder<'a> {
    pub fn plain(mut self, text: impl AsRef<str>) -> Self {
        self.inner.append_text(text);
        self
    }

    pub fn bold(self, text: impl AsRef<str>) -> Self {
        self.entity(text, MessageEntityKind::Bold)
    }

    pub fn italic(self, text: impl AsRef<str>) -> Self {
        self.entity(text, MessageEntityKind::Italic)
    }

    pub fn code(self, text: impl AsRef<str>) -> Self {
        self.entity(text, MessageEntityKind::Code)
    }

    pub fn user(mut self, user: &User) -> Self {
        self.inner.append_user(user);
        self
    }

    pub fn entity(mut self, text: impl AsRef<str>, kind: MessageEntityKind) -> Self {
        self.inner.append_text_with_entity(text, kind);
        self
    }

    pub fn build(self) -> MessageText<'a> {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use teloxide::types::UserId;

    use super::*;

    fn user(username: Option<&str>) -> User {
        User {
            id: UserId(42),
            is_bot: false,
            first_name: "Asha".into(),
            last_name: Some("Rao".into()),
            username: username.map(Into::into),
            language_code: None,
            is_premium: false,
            added_to_attachment_menu: false,
        }
    }

    #[test]
    fn builder_offsets() {
        let msg_text = mtb()
            .bold("Until:")
            .plain(" 3 May 2026\n")
            .plain("喵呜🐱 ")
            .code("Lobster")
            .build();

        assert_eq!(msg_text.text(), "Until: 3 May 2026\n喵呜🐱 Lobster");
        assert_eq!(
            msg_text.entities(),
            vec![
                MessageEntity {
                    kind: MessageEntityKind::Bold,
                    offset: 0,
                    length: 6,
                },
                MessageEntity {
                    kind: MessageEntityKind::Code,
                    offset: 23,
                    length: 7,
                }
            ]
        );
    }

    #[test]
    fn prepend_shifts_entities() {
        let mut msg_text = mtb().plain("Failed to ").bold("ban").plain(" user.").build();
        msg_text.prepend_text("⚠️ ");

        assert_eq!(msg_text.text(), "⚠️ Failed to ban user.");
        // "⚠️ " is three UTF-16 units.
        assert_eq!(msg_text.entities()[0].offset, 13);
        assert_eq!(msg_text.entities()[0].length, 3);
    }

    #[test]
    fn user_tags() {
        let with_name = mtb().user(&user(Some("asha_r"))).plain(" was warned").build();
        assert_eq!(with_name.text(), "@asha_r was warned");
        assert!(with_name.entities().is_empty());

        let anonymous = mtb().plain("Hi ").user(&user(None)).build();
        assert_eq!(anonymous.text(), "Hi Asha Rao");
        assert_eq!(
            anonymous.entities(),
            vec![MessageEntity {
                kind: MessageEntityKind::TextMention {
                    user: user(None)
                },
                offset: 3,
                length: 8,
            }]
        );
    }
}
