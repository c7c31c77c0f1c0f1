//! Recursive attachment discovery over a message and its forwarded subtree.
//!
//! Traversal uses an explicit work stack so deeply forwarded chains cannot
//! grow the call stack; emission order matches depth-first left-to-right
//! recursion: a node's own attachments first, then each forwarded message's
//! subtree in encountered order.

use crate::domain::{Attachment, MediaItem, MessageNode, PhotoAttachment, VideoAttachment};

/// Extraction result. Photos are complete; videos still need URL resolution
/// (a network step owned by [`crate::usecases::VideoResolver`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Photo(MediaItem),
    Video(VideoAttachment),
}

/// Flatten every media attachment reachable from `root`, including forwarded
/// messages at any depth. Unknown attachment kinds are skipped silently.
pub fn extract_media(root: &MessageNode) -> Vec<Extracted> {
    let mut out = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        for attachment in &node.attachments {
            match attachment {
                Attachment::Photo(photo) => {
                    if let Some(item) = photo_item(photo) {
                        out.push(Extracted::Photo(item));
                    }
                }
                Attachment::Video(video) => {
                    // Third-party-hosted videos are not retrievable at all.
                    if video.platform.is_none() {
                        out.push(Extracted::Video(video.clone()));
                    }
                }
                Attachment::Other => {}
            }
        }
        // Reverse push so the leftmost forwarded message is processed first.
        for forwarded in node.forwarded.iter().rev() {
            stack.push(forwarded);
        }
    }

    out
}

/// Photo handler: pick the maximum-width size variant. A photo with zero
/// available sizes yields no item rather than failing the message.
fn photo_item(photo: &PhotoAttachment) -> Option<MediaItem> {
    let best = photo.sizes.iter().max_by_key(|s| s.width)?;
    Some(MediaItem::Photo {
        id: format!("photo{}_{}", photo.owner_id, photo.id),
        url: best.url.clone(),
        date: photo.date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PhotoSize;

    fn photo(id: i64, urls: &[(u32, &str)]) -> Attachment {
        Attachment::Photo(PhotoAttachment {
            owner_id: 1,
            id,
            date: 1_700_000_000,
            sizes: urls
                .iter()
                .map(|(width, url)| PhotoSize {
                    width: *width,
                    url: (*url).to_string(),
                })
                .collect(),
        })
    }

    fn video(id: i64, platform: Option<&str>) -> Attachment {
        Attachment::Video(VideoAttachment {
            owner_id: 1,
            id,
            date: 1_700_000_000,
            title: format!("video {id}"),
            access_key: None,
            platform: platform.map(String::from),
        })
    }

    fn extracted_ids(root: &MessageNode) -> Vec<String> {
        extract_media(root)
            .into_iter()
            .map(|e| match e {
                Extracted::Photo(item) => item.id().to_string(),
                Extracted::Video(v) => format!("video{}_{}", v.owner_id, v.id),
            })
            .collect()
    }

    #[test]
    fn test_photo_selects_max_width() {
        let node = MessageNode {
            attachments: vec![photo(1, &[(100, "small"), (800, "large"), (400, "mid")])],
            forwarded: vec![],
        };
        match &extract_media(&node)[0] {
            Extracted::Photo(item) => assert_eq!(item.url(), "large"),
            other => panic!("expected photo, got {other:?}"),
        }
    }

    #[test]
    fn test_photo_without_sizes_yields_nothing() {
        let node = MessageNode {
            attachments: vec![photo(1, &[])],
            forwarded: vec![],
        };
        assert!(extract_media(&node).is_empty());
    }

    #[test]
    fn test_unknown_attachment_skipped() {
        let node = MessageNode {
            attachments: vec![Attachment::Other, photo(2, &[(10, "u")]), Attachment::Other],
            forwarded: vec![],
        };
        assert_eq!(extracted_ids(&node), vec!["photo1_2"]);
    }

    #[test]
    fn test_platform_hosted_video_excluded() {
        let node = MessageNode {
            attachments: vec![video(1, Some("YouTube")), video(2, None)],
            forwarded: vec![],
        };
        assert_eq!(extracted_ids(&node), vec!["video1_2"]);
    }

    #[test]
    fn test_depth_first_left_to_right_order() {
        // root(p1) -> [fwd_a(p2) -> [fwd_a1(p3)], fwd_b(p4)]
        let root = MessageNode {
            attachments: vec![photo(1, &[(1, "u1")])],
            forwarded: vec![
                MessageNode {
                    attachments: vec![photo(2, &[(1, "u2")])],
                    forwarded: vec![MessageNode {
                        attachments: vec![photo(3, &[(1, "u3")])],
                        forwarded: vec![],
                    }],
                },
                MessageNode {
                    attachments: vec![photo(4, &[(1, "u4")])],
                    forwarded: vec![],
                },
            ],
        };
        assert_eq!(
            extracted_ids(&root),
            vec!["photo1_1", "photo1_2", "photo1_3", "photo1_4"]
        );
    }

    #[test]
    fn test_deep_forwarding_chain() {
        // 10_000 levels of forwarding must not overflow the stack.
        let mut node = MessageNode {
            attachments: vec![photo(0, &[(1, "leaf")])],
            forwarded: vec![],
        };
        for _ in 0..10_000 {
            node = MessageNode {
                attachments: vec![],
                forwarded: vec![node],
            };
        }
        assert_eq!(extract_media(&node).len(), 1);
    }
}
