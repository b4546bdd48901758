//! Server-rendered shells for the public pages. The interactive form posts
//! to `/api/v1/registrations`; these handlers only provide the static copy.

use axum::response::Html;

pub(crate) async fn landing() -> Html<&'static str> {
    Html(
        r#"<!doctype html>
<html lang="ja">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>メンラボJOB | 男性介護士向け求人登録</title>
</head>
<body>
<main>
<h1>メンラボJOB</h1>
<p>男性介護士のための転職サポート。希望条件を登録すると、担当者から求人のご案内をお送りします。</p>
<p><a href="/api/v1/registrations">登録フォームへ</a></p>
</main>
</body>
</html>
"#,
    )
}

pub(crate) async fn complete() -> Html<&'static str> {
    Html(
        r#"<!doctype html>
<html lang="ja">
<head>
<meta charset="utf-8">
<title>登録完了 | メンラボJOB</title>
</head>
<body>
<main>
<h1>登録が完了しました</h1>
<p>ご登録ありがとうございます。担当者より順次ご連絡いたします。</p>
<p><a href="/">トップページへ戻る</a></p>
</main>
</body>
</html>
"#,
    )
}

pub(crate) async fn terms() -> Html<&'static str> {
    Html(
        r#"<!doctype html>
<html lang="ja">
<head>
<meta charset="utf-8">
<title>利用規約 | メンラボJOB</title>
</head>
<body>
<main>
<h1>利用規約</h1>
<p>本サービスの利用にあたっては、登録情報を求人紹介の目的にのみ使用します。登録フォームの送信をもって本規約に同意したものとみなします。</p>
<p><a href="/">トップページへ戻る</a></p>
</main>
</body>
</html>
"#,
    )
}
