mod recursive;
